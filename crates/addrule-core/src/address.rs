/// The address value under test and its builder.
///
/// An [`Address`] is plain data: building one never fails and never checks
/// anything. Validity is a property evaluated on demand with
/// [`crate::validate`], or in one step with [`AddressBuilder::build_valid`].
use serde::{Deserialize, Serialize};

use crate::fields::Field;
use crate::store::RuleStore;
use crate::validation::{ValidationResult, validate};

/// A postal address.
///
/// The three subdivision fields hold subdivision IDs (not display names) when
/// the country publishes a subdivision list for that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub name: String,
    pub organization: String,
    /// Street address, one entry per line.
    pub street_address: Vec<String>,
    pub dependent_locality: String,
    pub locality: String,
    pub administrative_area: String,
    pub post_code: String,
    pub sorting_code: String,
}

impl Address {
    /// Starts an [`AddressBuilder`].
    pub fn builder() -> AddressBuilder {
        AddressBuilder::default()
    }

    /// Returns `true` if `field` carries a value that is not just whitespace.
    ///
    /// For [`Field::StreetAddress`] at least one line must be non-blank.
    pub fn has_value(&self, field: Field) -> bool {
        match field {
            Field::StreetAddress => self
                .street_address
                .iter()
                .any(|line| !line.trim().is_empty()),
            Field::Country
            | Field::Name
            | Field::Organization
            | Field::DependentLocality
            | Field::Locality
            | Field::AdministrativeArea
            | Field::PostCode
            | Field::SortingCode => !self.text(field).trim().is_empty(),
        }
    }

    /// Returns the single-line value of `field`. Street address lines are
    /// joined with `\n`.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::StreetAddress => self.street_address.join("\n"),
            Field::Country
            | Field::Name
            | Field::Organization
            | Field::DependentLocality
            | Field::Locality
            | Field::AdministrativeArea
            | Field::PostCode
            | Field::SortingCode => self.text(field).to_owned(),
        }
    }

    fn text(&self, field: Field) -> &str {
        match field {
            Field::Country => &self.country,
            Field::Name => &self.name,
            Field::Organization => &self.organization,
            Field::DependentLocality => &self.dependent_locality,
            Field::Locality => &self.locality,
            Field::AdministrativeArea => &self.administrative_area,
            Field::PostCode => &self.post_code,
            Field::SortingCode => &self.sorting_code,
            Field::StreetAddress => "",
        }
    }
}

// ---------------------------------------------------------------------------
// AddressBuilder
// ---------------------------------------------------------------------------

/// Option-style builder for [`Address`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    /// Sets the country code. The code is upper-cased.
    pub fn country(mut self, code: &str) -> Self {
        self.address.country = code.to_uppercase();
        self
    }

    /// Sets the recipient name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.address.name = name.into();
        self
    }

    /// Sets the organization.
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.address.organization = organization.into();
        self
    }

    /// Sets the street address lines.
    pub fn street_address<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address.street_address = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the dependent locality. Use the subdivision ID when the country
    /// lists dependent localities.
    pub fn dependent_locality(mut self, dependent_locality: impl Into<String>) -> Self {
        self.address.dependent_locality = dependent_locality.into();
        self
    }

    /// Sets the locality. Use the subdivision ID when the country lists
    /// localities.
    pub fn locality(mut self, locality: impl Into<String>) -> Self {
        self.address.locality = locality.into();
        self
    }

    /// Sets the administrative area. Use the subdivision ID when the country
    /// lists administrative areas.
    pub fn administrative_area(mut self, administrative_area: impl Into<String>) -> Self {
        self.address.administrative_area = administrative_area.into();
        self
    }

    /// Sets the post code as written, prefix included.
    pub fn post_code(mut self, post_code: impl Into<String>) -> Self {
        self.address.post_code = post_code.into();
        self
    }

    /// Sets the sorting code.
    pub fn sorting_code(mut self, sorting_code: impl Into<String>) -> Self {
        self.address.sorting_code = sorting_code.into();
        self
    }

    /// Returns the address without validating it.
    pub fn build(self) -> Address {
        self.address
    }

    /// Returns the address if it is valid against `store`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddress`] carrying the address and every violation.
    pub fn build_valid(self, store: &RuleStore) -> Result<Address, InvalidAddress> {
        let address = self.address;
        let errors = validate(store, &address);
        if errors.is_empty() {
            Ok(address)
        } else {
            Err(InvalidAddress { address, errors })
        }
    }
}

/// Returned by [`AddressBuilder::build_valid`] for an invalid address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address: {errors}")]
pub struct InvalidAddress {
    /// The address as built.
    pub address: Address,
    /// Every violation found.
    pub errors: ValidationResult,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_every_field() {
        let a = Address::builder()
            .country("au")
            .name("Jane Citizen")
            .organization("ACME")
            .street_address(["1 George St", "Level 3"])
            .dependent_locality("Haymarket")
            .locality("Sydney")
            .administrative_area("NSW")
            .post_code("2000")
            .sorting_code("X1")
            .build();
        assert_eq!(a.country, "AU");
        assert_eq!(a.street_address, vec!["1 George St", "Level 3"]);
        assert_eq!(a.value(Field::StreetAddress), "1 George St\nLevel 3");
        assert_eq!(a.value(Field::AdministrativeArea), "NSW");
        assert_eq!(a.sorting_code, "X1");
    }

    #[test]
    fn blank_values_do_not_count() {
        let a = Address::builder()
            .name("   ")
            .street_address(["", " \t"])
            .post_code("2000")
            .build();
        assert!(!a.has_value(Field::Name));
        assert!(!a.has_value(Field::StreetAddress));
        assert!(a.has_value(Field::PostCode));
        assert!(!a.has_value(Field::Country));
    }

    #[test]
    fn default_builder_is_empty() {
        assert_eq!(Address::builder().build(), Address::default());
    }
}

/// Address field enumerations.
///
/// [`Field`] names a structural address component. [`FieldName`] names the
/// label a country uses for a renameable field (India calls its post code a
/// "PIN Code", Ireland an "Eircode"). Both serialize as their `PascalCase`
/// variant names, which is also the form used in the compiled rule store.
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A structural address component.
///
/// Variant order is the conventional top-down order of an address and is the
/// order used whenever fields are listed (missing-field reports, externalized
/// country data, serialized field sets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// ISO 3166-1 alpha-2 country code.
    Country,
    /// Addressee name.
    Name,
    /// Addressee organization.
    Organization,
    /// Street address lines.
    StreetAddress,
    /// Dependent locality (suburb, neighbourhood, district).
    DependentLocality,
    /// Locality (city, post town).
    Locality,
    /// Administrative area (state, province, prefecture).
    AdministrativeArea,
    /// Post code.
    PostCode,
    /// Sorting code (CEDEX and similar).
    SortingCode,
}

impl Field {
    /// Fields other than [`Field::Country`]; the ones an address may leave blank.
    pub const OPTIONAL: [Field; 8] = [
        Field::Name,
        Field::Organization,
        Field::StreetAddress,
        Field::DependentLocality,
        Field::Locality,
        Field::AdministrativeArea,
        Field::PostCode,
        Field::SortingCode,
    ];

    /// Returns the variant name (e.g. `"PostCode"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Name => "Name",
            Self::Organization => "Organization",
            Self::StreetAddress => "StreetAddress",
            Self::DependentLocality => "DependentLocality",
            Self::Locality => "Locality",
            Self::AdministrativeArea => "AdministrativeArea",
            Self::PostCode => "PostCode",
            Self::SortingCode => "SortingCode",
        }
    }

    /// Returns a human-readable label suitable for form rendering.
    pub fn readable(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Name => "Name",
            Self::Organization => "Organization",
            Self::StreetAddress => "Street Address",
            Self::DependentLocality => "Dependent Locality",
            Self::Locality => "Locality",
            Self::AdministrativeArea => "Administrative Area",
            Self::PostCode => "Post Code",
            Self::SortingCode => "Sorting Code",
        }
    }

    /// Returns the key the upstream metadata uses for this field.
    ///
    /// Every field except [`Field::Country`] has a one-letter key that appears
    /// as a `%X` token in address format templates and as a letter in the
    /// `require` / `upper` field lists.
    pub fn key(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Name => "N",
            Self::Organization => "O",
            Self::StreetAddress => "A",
            Self::DependentLocality => "D",
            Self::Locality => "C",
            Self::AdministrativeArea => "S",
            Self::PostCode => "Z",
            Self::SortingCode => "X",
        }
    }

    /// Maps a one-letter upstream key back to its field.
    ///
    /// Letters with no field counterpart (the upstream format also uses `%n`
    /// for line breaks and a few presentation-only letters) return `None`.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'N' => Some(Self::Name),
            'O' => Some(Self::Organization),
            'A' => Some(Self::StreetAddress),
            'D' => Some(Self::DependentLocality),
            'C' => Some(Self::Locality),
            'S' => Some(Self::AdministrativeArea),
            'Z' => Some(Self::PostCode),
            'X' => Some(Self::SortingCode),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins field names with `,` (the form used in validation messages).
pub(crate) fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// FieldName
// ---------------------------------------------------------------------------

/// The label a country uses for a renameable [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldName {
    Area,
    City,
    County,
    Department,
    District,
    DoSi,
    Eircode,
    Emirate,
    Island,
    Neighborhood,
    Oblast,
    PINCode,
    Parish,
    PostTown,
    PostalCode,
    Prefecture,
    Province,
    State,
    Suburb,
    Townland,
    VillageTownship,
    ZipCode,
}

impl FieldName {
    /// Every label, in declaration order.
    pub const ALL: [FieldName; 22] = [
        FieldName::Area,
        FieldName::City,
        FieldName::County,
        FieldName::Department,
        FieldName::District,
        FieldName::DoSi,
        FieldName::Eircode,
        FieldName::Emirate,
        FieldName::Island,
        FieldName::Neighborhood,
        FieldName::Oblast,
        FieldName::PINCode,
        FieldName::Parish,
        FieldName::PostTown,
        FieldName::PostalCode,
        FieldName::Prefecture,
        FieldName::Province,
        FieldName::State,
        FieldName::Suburb,
        FieldName::Townland,
        FieldName::VillageTownship,
        FieldName::ZipCode,
    ];

    /// Returns the variant name (e.g. `"PINCode"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::City => "City",
            Self::County => "County",
            Self::Department => "Department",
            Self::District => "District",
            Self::DoSi => "DoSi",
            Self::Eircode => "Eircode",
            Self::Emirate => "Emirate",
            Self::Island => "Island",
            Self::Neighborhood => "Neighborhood",
            Self::Oblast => "Oblast",
            Self::PINCode => "PINCode",
            Self::Parish => "Parish",
            Self::PostTown => "PostTown",
            Self::PostalCode => "PostalCode",
            Self::Prefecture => "Prefecture",
            Self::Province => "Province",
            Self::State => "State",
            Self::Suburb => "Suburb",
            Self::Townland => "Townland",
            Self::VillageTownship => "VillageTownship",
            Self::ZipCode => "ZipCode",
        }
    }

    /// Returns a human-readable label suitable for form rendering.
    pub fn readable(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::City => "City",
            Self::County => "County",
            Self::Department => "Department",
            Self::District => "District",
            Self::DoSi => "Do/Si",
            Self::Eircode => "Eircode",
            Self::Emirate => "Emirate",
            Self::Island => "Island",
            Self::Neighborhood => "Neighborhood",
            Self::Oblast => "Oblast",
            Self::PINCode => "PIN Code",
            Self::Parish => "Parish",
            Self::PostTown => "Post Town",
            Self::PostalCode => "Postal Code",
            Self::Prefecture => "Prefecture",
            Self::Province => "Province",
            Self::State => "State",
            Self::Suburb => "Suburb",
            Self::Townland => "Townland",
            Self::VillageTownship => "Village/Township",
            Self::ZipCode => "ZIP Code",
        }
    }

    /// Returns the `snake_case` token the upstream metadata uses in its
    /// `*_name_type` attributes.
    pub fn upstream_label(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::City => "city",
            Self::County => "county",
            Self::Department => "department",
            Self::District => "district",
            Self::DoSi => "do_si",
            Self::Eircode => "eircode",
            Self::Emirate => "emirate",
            Self::Island => "island",
            Self::Neighborhood => "neighborhood",
            Self::Oblast => "oblast",
            Self::PINCode => "pin",
            Self::Parish => "parish",
            Self::PostTown => "post_town",
            Self::PostalCode => "postal",
            Self::Prefecture => "prefecture",
            Self::Province => "province",
            Self::State => "state",
            Self::Suburb => "suburb",
            Self::Townland => "townland",
            Self::VillageTownship => "village_township",
            Self::ZipCode => "zip",
        }
    }

    /// Parses an upstream `*_name_type` token. Returns `None` for unknown labels.
    pub fn from_upstream(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.upstream_label() == label)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn field_keys_match_upstream_letters() {
        let expected = [
            (Field::Country, "country"),
            (Field::Name, "N"),
            (Field::Organization, "O"),
            (Field::StreetAddress, "A"),
            (Field::DependentLocality, "D"),
            (Field::Locality, "C"),
            (Field::AdministrativeArea, "S"),
            (Field::PostCode, "Z"),
            (Field::SortingCode, "X"),
        ];
        for (field, key) in expected {
            assert_eq!(field.key(), key, "key for {field}");
        }
    }

    #[test]
    fn from_key_inverts_key_for_lettered_fields() {
        for field in Field::OPTIONAL {
            let letter = field.key().chars().next().expect("one letter");
            assert_eq!(Field::from_key(letter), Some(field));
        }
    }

    #[test]
    fn from_key_rejects_presentation_letters() {
        assert_eq!(Field::from_key('n'), None);
        assert_eq!(Field::from_key('T'), None);
    }

    #[test]
    fn field_serializes_as_variant_name() {
        let json = serde_json::to_string(&Field::PostCode).expect("serialize");
        assert_eq!(json, "\"PostCode\"");
        let back: Field = serde_json::from_str("\"SortingCode\"").expect("deserialize");
        assert_eq!(back, Field::SortingCode);
    }

    #[test]
    fn field_order_follows_address_order() {
        let mut shuffled = vec![Field::PostCode, Field::Name, Field::Locality];
        shuffled.sort();
        assert_eq!(shuffled, vec![Field::Name, Field::Locality, Field::PostCode]);
    }

    #[test]
    fn join_fields_uses_commas() {
        assert_eq!(
            join_fields(&[Field::Name, Field::PostCode]),
            "Name,PostCode"
        );
        assert_eq!(join_fields(&[]), "");
    }

    #[test]
    fn field_name_upstream_labels_round_trip() {
        for name in FieldName::ALL {
            assert_eq!(FieldName::from_upstream(name.upstream_label()), Some(name));
        }
    }

    #[test]
    fn field_name_rejects_unknown_label() {
        assert_eq!(FieldName::from_upstream("hamlet"), None);
        assert_eq!(FieldName::from_upstream(""), None);
    }

    #[test]
    fn india_labels_post_code_as_pin() {
        let name = FieldName::from_upstream("pin").expect("known label");
        assert_eq!(name, FieldName::PINCode);
        assert_eq!(name.readable(), "PIN Code");
        assert_eq!(name.to_string(), "PINCode");
    }
}

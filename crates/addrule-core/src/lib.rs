#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod address;
pub mod country_data;
pub mod fields;
pub mod resolve;
pub mod rules;
pub mod store;
mod subdivisions;
pub mod validation;

pub use address::{Address, AddressBuilder, InvalidAddress};
pub use country_data::{CountryData, Labeled};
pub use fields::{Field, FieldName};
pub use resolve::ResolvedRule;
pub use rules::{
    AdministrativeArea, CountryRule, DependentLocality, Locality, PostCodeRule,
    find_administrative_area,
};
pub use store::{CountrySummary, DEFAULTS_KEY, RuleStore, StoreError};
pub use validation::{ValidationError, ValidationResult, validate};

/// Returns the current version of the addrule-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}

//! Checks against the rule store bundled with the crate.
#![allow(clippy::expect_used)]

use addrule_core::{
    Address, Field, FieldName, RuleStore, ValidationError, validate,
};

fn store() -> &'static RuleStore {
    RuleStore::bundled().expect("bundled store loads")
}

#[test]
fn every_country_resolves_with_fields() {
    let store = store();
    assert!(!store.is_empty());
    for code in store.country_codes() {
        let rule = store.resolve(code).expect("listed code resolves");
        assert!(!rule.required_fields().is_empty(), "{code} required");
        assert!(!rule.allowed_fields().is_empty(), "{code} allowed");
        assert!(!rule.format().is_empty(), "{code} format");
    }
}

#[test]
fn serialized_form_is_byte_stable() {
    let store = store();
    let json = store.to_json_pretty().expect("serialize");
    let reparsed = RuleStore::from_json(&json).expect("reparse");
    assert_eq!(&reparsed, store);
    assert_eq!(reparsed.to_json_pretty().expect("serialize"), json);
}

#[test]
fn us_address_with_matching_state_zip_is_valid() {
    let address = Address::builder()
        .country("us")
        .name("Jane Doe")
        .street_address(["1600 Amphitheatre Pkwy"])
        .locality("Mountain View")
        .administrative_area("CA")
        .post_code("94043")
        .build();
    let result = validate(store(), &address);
    assert!(result.is_valid(), "{result}");
}

#[test]
fn us_zip_outside_state_range_is_rejected() {
    let address = Address::builder()
        .country("US")
        .street_address(["1 Main St"])
        .locality("Albany")
        .administrative_area("CA")
        .post_code("12207")
        .build();
    let result = validate(store(), &address);
    assert_eq!(result.errors(), &[ValidationError::InvalidPostCode]);
}

#[test]
fn us_unknown_state_is_rejected() {
    let address = Address::builder()
        .country("US")
        .street_address(["1 Main St"])
        .locality("Springfield")
        .administrative_area("Springfield State")
        .post_code("12207")
        .build();
    let result = validate(store(), &address);
    assert_eq!(result.errors(), &[ValidationError::InvalidAdministrativeArea]);
}

#[test]
fn antigua_falls_back_to_default_format() {
    let data = store().get_country("AG").expect("AG is bundled");
    assert_eq!(data.format, "%N%n%O%n%A%n%C");
    assert_eq!(data.required_fields, vec![Field::StreetAddress.into()]);
    let locality = data.locality_name_type.expect("ZZ names the locality");
    assert_eq!(locality.id, FieldName::City);
    assert_eq!(locality.display, "City");
}

#[test]
fn india_labels_post_code_as_pin() {
    let rule = store().resolve("IN").expect("IN is bundled");
    assert_eq!(rule.post_code_name_type(), Some(FieldName::PINCode));
}

#[test]
fn puerto_rico_carries_post_code_prefix() {
    let rule = store().resolve("PR").expect("PR is bundled");
    assert_eq!(rule.post_code_prefix(), "PR ");
}

#[test]
fn canada_names_are_available_in_french() {
    let store = store();
    assert_eq!(
        store.administrative_area_name("CA", "QC", Some("fr")),
        Some("Québec")
    );
    assert_eq!(
        store.administrative_area_name("CA", "QC", Some("en")),
        Some("Quebec")
    );
    assert_eq!(store.administrative_area_postal_key("CA", "QC"), Some("QC"));
}

#[test]
fn france_allows_sorting_code() {
    let address = Address::builder()
        .country("FR")
        .organization("ACME")
        .street_address(["8 Rue de Rivoli"])
        .locality("Paris")
        .post_code("75001")
        .sorting_code("CEDEX 01")
        .build();
    assert!(validate(store(), &address).is_valid());
}

#[test]
fn germany_rejects_administrative_area() {
    let address = Address::builder()
        .country("DE")
        .street_address(["Unter den Linden 1"])
        .locality("Berlin")
        .administrative_area("BE")
        .post_code("10117")
        .build();
    let result = validate(store(), &address);
    assert_eq!(
        result.unsupported_fields(),
        Some(&[Field::AdministrativeArea][..])
    );
}

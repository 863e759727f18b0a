//! End-to-end generator runs against the upstream mirror in
//! `tests/fixtures/mirror/`.
//!
//! The mirror holds a handful of countries chosen for their upstream quirks:
//! CA (two languages), CN (skipped subdivisions), KR (three levels with
//! latinized names), PR (prefix override), TV (name override), US (per-state
//! post-code regexes) and the `ZZ` defaults record.
#![allow(clippy::expect_used)]

use std::path::PathBuf;

use addrule_core::{Address, Field, FieldName, RuleStore, validate};
use addrule_gen::{DirFetcher, Generation, Generator, GeneratorConfig, render};

fn mirror() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mirror")
}

fn generator(workers: usize) -> Generator<DirFetcher> {
    let config = GeneratorConfig::default().with_workers(workers);
    Generator::new(config, DirFetcher::new(mirror()))
}

fn generate(workers: usize) -> Generation {
    generator(workers).run().expect("run")
}

fn store() -> RuleStore {
    let generation = generate(4);
    assert!(
        generation.is_complete(),
        "unexpected failures: {:?}",
        generation.failures
    );
    generation.into_store().expect("store")
}

#[test]
fn work_list_adds_defaults() {
    let codes = generator(1).country_codes().expect("codes");
    assert_eq!(codes, vec!["CA", "CN", "KR", "PR", "TV", "US", "ZZ"]);
}

#[test]
fn every_country_compiles() {
    let store = store();
    let codes: Vec<&str> = store.country_codes().collect();
    assert_eq!(codes, vec!["CA", "CN", "KR", "PR", "TV", "US"]);
    let defaults = store.defaults();
    assert_eq!(defaults.default_language, "");
    assert_eq!(defaults.post_code_name_type, Some(FieldName::PostalCode));
    assert_eq!(defaults.dependent_locality_name_type, Some(FieldName::Suburb));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let first = render(&generate(1).into_store().expect("store")).expect("render");
    let second = render(&generate(8).into_store().expect("store")).expect("render");
    assert_eq!(first, second);
}

#[test]
fn rendered_store_reloads() {
    let store = store();
    let json = render(&store).expect("render");
    assert_eq!(RuleStore::from_json(&json).expect("reload"), store);
}

#[test]
fn us_states_carry_post_code_prefixes() {
    let store = store();
    let us = store.country("US").expect("US");
    assert_eq!(us.default_language, "en");
    assert_eq!(us.post_code_name_type, Some(FieldName::ZipCode));
    let ca = us.post_code_regex.subdivision("CA").expect("CA");
    assert!(ca.is_match("94043"));
    assert!(!ca.is_match("10001"));

    let address = Address::builder()
        .country("US")
        .street_address(["1600 Amphitheatre Pkwy"])
        .locality("Mountain View")
        .administrative_area("CA")
        .post_code("10001")
        .build();
    let result = validate(&store, &address);
    assert!(result.has_invalid_post_code());
    assert_eq!(result.len(), 1);
}

#[test]
fn translated_tree_is_stored_under_its_language() {
    let store = store();
    let ca = store.country("CA").expect("CA");
    assert_eq!(
        ca.administrative_areas.keys().collect::<Vec<_>>(),
        vec!["en", "fr"]
    );
    assert_eq!(store.administrative_area_name("CA", "QC", Some("fr")), Some("Québec"));
    assert_eq!(store.administrative_area_name("CA", "QC", Some("en")), Some("Quebec"));
    // the post-code subtree only comes from the default-language pass
    let qc = ca.post_code_regex.subdivision("QC").expect("QC");
    assert_eq!(qc.pattern(), "^G|H[0-5]|J");
}

#[test]
fn territories_and_unrecognised_regions_are_skipped() {
    let store = store();
    let areas = store.administrative_areas("CN", None).expect("areas");
    let ids: Vec<&str> = areas.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["11"]);
    assert_eq!(areas[0].name, "北京市");
}

#[test]
fn three_levels_with_latinized_names() {
    let store = store();
    let kr = store.country("KR").expect("KR");
    assert_eq!(kr.default_language, "ko");
    assert_eq!(kr.administrative_area_name_type, Some(FieldName::DoSi));
    assert_eq!(kr.dependent_locality_name_type, Some(FieldName::District));

    let native = kr.default_administrative_areas().expect("ko tree");
    assert_eq!(native[0].id, "11");
    assert_eq!(native[0].postal_key, "서울특별시");
    assert_eq!(native[0].localities[0].id, "강남구");
    assert_eq!(
        native[0].localities[0].dependent_localities[0].id,
        "역삼동"
    );

    let latin = kr.administrative_areas.get("en").expect("latin tree");
    let names: Vec<&str> = latin.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Busan", "Seoul"]);
    let seoul = &latin[1];
    assert_eq!(seoul.id, "11");
    let gangnam = seoul.locality("강남구").expect("Gangnam");
    let dongs: Vec<&str> = gangnam
        .dependent_localities
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(dongs, vec!["Apgujeong-dong", "Yeoksam-dong"]);

    assert_eq!(
        store.dependent_locality_name("KR", "11", "강남구", "압구정동", Some("en")),
        Some("Apgujeong-dong")
    );
}

#[test]
fn overrides_are_applied() {
    let store = store();
    let pr = store.country("PR").expect("PR");
    assert_eq!(pr.post_code_prefix, "PR ");
    assert_eq!(pr.default_language, "es");
    let tv = store.country("TV").expect("TV");
    assert_eq!(tv.name, "Tuvalu");
}

#[test]
fn format_tokens_drive_allowed_fields() {
    let store = store();
    let tv = store.resolve("TV").expect("TV");
    assert!(tv.allowed_fields().contains(&Field::AdministrativeArea));
    assert!(!tv.allowed_fields().contains(&Field::PostCode));
    // TV requires nothing itself, so the defaults apply
    assert!(tv.required_fields().contains(&Field::Locality));
}

#[test]
fn single_country_compile() {
    let rule = generator(1).compile("US").expect("US");
    assert_eq!(rule.id, "US");
    assert_eq!(rule.required_fields.len(), 4);
}

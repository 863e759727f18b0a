//! Failure handling of a generator run, driven by an in-memory upstream.
#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use addrule_gen::{Fetcher, GenerateError, Generator, GeneratorConfig};

/// Upstream fake: a map from record path to JSON body. Unknown paths fail
/// like an HTTP 404 would.
#[derive(Debug, Default)]
struct MemoryUpstream {
    records: BTreeMap<String, String>,
}

impl MemoryUpstream {
    fn with(mut self, path: &str, body: &str) -> Self {
        self.records.insert(path.to_owned(), body.to_owned());
        self
    }

    fn healthy() -> Self {
        Self::default()
            .with("data", r#"{"id":"data","countries":"DE~XS"}"#)
            .with(
                "data/ZZ",
                r#"{"id":"data/ZZ","fmt":"%N%n%O%n%A%n%C","require":"AC"}"#,
            )
            .with(
                "data/DE",
                r#"{"id":"data/DE","key":"DE","fmt":"%N%n%O%n%A%n%Z %C","require":"ACZ","zip":"\\d{5}","zipex":"26133,53225"}"#,
            )
    }
}

impl Fetcher for MemoryUpstream {
    fn fetch(&self, path: &str) -> Result<String, GenerateError> {
        self.records
            .get(path)
            .cloned()
            .ok_or_else(|| GenerateError::Fetch {
                path: path.to_owned(),
                detail: "HTTP 404".to_owned(),
            })
    }
}

fn generator(upstream: MemoryUpstream, fail_fast: bool) -> Generator<MemoryUpstream> {
    let config = GeneratorConfig::default()
        .with_workers(2)
        .with_fail_fast(fail_fast);
    Generator::new(config, upstream)
}

#[test]
fn a_bad_sample_fails_only_its_country() {
    let upstream = MemoryUpstream::healthy().with(
        "data/XS",
        r#"{"id":"data/XS","key":"XS","zip":"\\d{4}","zipex":"1234,ABCD"}"#,
    );
    let generation = generator(upstream, false).run().expect("run");
    assert!(!generation.is_complete());
    assert_eq!(generation.failures.len(), 1);
    let err = generation.failures.get("XS").expect("XS failed");
    assert!(
        matches!(err, GenerateError::SampleMismatch { sample, .. } if sample == "ABCD"),
        "unexpected error: {err}"
    );
    assert!(!err.is_upstream());

    let store = generation.into_store().expect("store without XS");
    assert!(store.has_country("DE"));
    assert!(!store.has_country("XS"));
}

#[test]
fn a_missing_record_is_an_upstream_failure() {
    let generation = generator(MemoryUpstream::healthy(), false)
        .run()
        .expect("run");
    let err = generation.failures.get("XS").expect("XS failed");
    assert!(err.is_upstream());
    assert_eq!(err.to_string(), "fetching data/XS: HTTP 404");
}

#[test]
fn a_broken_defaults_record_leaves_nothing_to_assemble() {
    let upstream = MemoryUpstream::healthy()
        .with("data/ZZ", r#"{"id":"data/ZZ","zip_name_type":"hamlet"}"#)
        .with("data/XS", r#"{"id":"data/XS","key":"XS"}"#);
    let generation = generator(upstream, false).run().expect("run");
    assert!(matches!(
        generation.failures.get("ZZ"),
        Some(GenerateError::UnknownFieldName { .. })
    ));
    assert_eq!(
        generation.into_store().expect_err("no defaults"),
        GenerateError::MissingDefaults
    );
}

#[test]
fn unreadable_country_list_fails_the_run() {
    let upstream = MemoryUpstream::healthy().with("data", "not json");
    let err = generator(upstream, false).run().expect_err("bad list");
    assert!(matches!(err, GenerateError::Decode { ref path, .. } if path == "data"));
}

#[test]
fn explicit_codes_always_include_defaults() {
    let generation = generator(MemoryUpstream::healthy(), false)
        .run_codes(vec!["DE".to_owned(), "DE".to_owned()])
        .expect("run");
    assert!(generation.is_complete());
    assert_eq!(
        generation.rules.keys().collect::<Vec<_>>(),
        vec!["DE", "ZZ"]
    );
}

#[test]
fn fail_fast_reports_the_first_failure() {
    let generation = generator(MemoryUpstream::healthy(), true)
        .run()
        .expect("run");
    assert!(generation.failures.contains_key("XS"));
}

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod emit;
pub mod error;
pub mod normalize;
pub mod pool;
pub mod process;
pub mod records;
pub mod upstream;

use std::collections::BTreeMap;

use addrule_core::{CountryRule, DEFAULTS_KEY, RuleStore};

pub use config::GeneratorConfig;
pub use emit::{assemble, render};
pub use error::GenerateError;
pub use pool::{Outcome, PoolOptions};
pub use process::compile_country;
pub use upstream::{DirFetcher, Fetcher, HttpFetcher};

use crate::records::{CountryList, decode};
use crate::upstream::COUNTRY_LIST_PATH;

/// Drives the fetch-normalize-compile pipeline over a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct Generator<F> {
    config: GeneratorConfig,
    fetcher: F,
}

impl Generator<HttpFetcher> {
    /// A generator talking to the upstream service named in `config`.
    pub fn http(config: GeneratorConfig) -> Self {
        let fetcher = HttpFetcher::new(&config);
        Self { config, fetcher }
    }
}

impl<F: Fetcher> Generator<F> {
    /// A generator reading records through `fetcher`.
    pub fn new(config: GeneratorConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// The work list: every upstream country plus `"ZZ"`, sorted.
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode error of the country list record.
    pub fn country_codes(&self) -> Result<Vec<String>, GenerateError> {
        let body = self.fetcher.fetch(COUNTRY_LIST_PATH)?;
        let list: CountryList = decode(COUNTRY_LIST_PATH, &body)?;
        let mut codes = list.codes();
        codes.push(DEFAULTS_KEY.to_owned());
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    /// Compiles a single country without the pool.
    ///
    /// # Errors
    ///
    /// See [`compile_country`].
    pub fn compile(&self, code: &str) -> Result<CountryRule, GenerateError> {
        compile_country(&self.fetcher, code)
    }

    /// Compiles every country upstream lists.
    ///
    /// # Errors
    ///
    /// Fails only when the country list itself cannot be read or the pool
    /// breaks down; per-country failures are collected in the
    /// [`Generation`].
    pub fn run(&self) -> Result<Generation, GenerateError> {
        let codes = self.country_codes()?;
        self.run_codes(codes)
    }

    /// Compiles the given countries. `"ZZ"` is added when missing so the
    /// result can always be assembled into a store.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Pool`] if the pool breaks down.
    pub fn run_codes(&self, mut codes: Vec<String>) -> Result<Generation, GenerateError> {
        if !codes.iter().any(|code| code == DEFAULTS_KEY) {
            codes.push(DEFAULTS_KEY.to_owned());
        }
        codes.sort();
        codes.dedup();
        tracing::info!(
            countries = codes.len(),
            workers = self.config.workers,
            "generating rule store"
        );

        let options = PoolOptions {
            workers: self.config.workers,
            fail_fast: self.config.fail_fast,
        };
        let mut generation = Generation::default();
        for outcome in pool::run(&self.fetcher, codes, options)? {
            match outcome.result {
                Ok(rule) => {
                    generation.rules.insert(outcome.code, rule);
                }
                Err(e) => {
                    generation.failures.insert(outcome.code, e);
                }
            }
        }
        tracing::info!(
            compiled = generation.rules.len(),
            failed = generation.failures.len(),
            "generation finished"
        );
        Ok(generation)
    }
}

/// Everything one generator run produced, keyed by country code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub rules: BTreeMap<String, CountryRule>,
    pub failures: BTreeMap<String, GenerateError>,
}

impl Generation {
    /// Returns `true` when no country failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Assembles the compiled countries into a store, leaving failed
    /// countries out.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::MissingDefaults`] when `"ZZ"` failed.
    pub fn into_store(self) -> Result<RuleStore, GenerateError> {
        assemble(self.rules)
    }
}

/// Returns the current version of the addrule-gen library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The immutable country rule store.
///
/// A [`RuleStore`] is built once (from the generator's JSON output or from the
/// copy bundled with this crate) and then shared by reference. Nothing in this
/// crate mutates a store after construction, so any number of threads may
/// validate against the same store without locking.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::rules::CountryRule;

/// Key of the synthetic defaults record.
pub const DEFAULTS_KEY: &str = "ZZ";

/// The store produced by the generator and bundled with this crate.
static BUNDLED_JSON: &str = include_str!("../data/countries.json");

static BUNDLED: LazyLock<Result<RuleStore, StoreError>> =
    LazyLock::new(|| RuleStore::from_json(BUNDLED_JSON));

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised while loading or serializing a [`RuleStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The input is not a valid store document (bad JSON, bad field name,
    /// or a post-code pattern that does not compile).
    #[error("invalid rule store: {detail}")]
    Parse {
        /// Decoder message, including line and column.
        detail: String,
    },
    /// The document has no `"ZZ"` defaults record.
    #[error("rule store has no \"ZZ\" defaults record")]
    MissingDefaults,
    /// The store could not be serialized.
    #[error("could not serialize rule store: {detail}")]
    Serialize {
        /// Encoder message.
        detail: String,
    },
}

// ---------------------------------------------------------------------------
// RuleStore
// ---------------------------------------------------------------------------

/// Country code plus upstream display name, as listed by
/// [`RuleStore::list_countries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// Upstream display name (may be empty).
    pub name: String,
}

/// Serialized shape of a store: every record, `"ZZ"` included, keyed by code.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    countries: BTreeMap<String, CountryRule>,
}

/// Immutable mapping from country code to [`CountryRule`], plus the `"ZZ"`
/// defaults record used by the defaulting resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStore {
    countries: BTreeMap<String, CountryRule>,
    defaults: CountryRule,
}

impl RuleStore {
    /// Builds a store from a defaults record and the per-country records.
    ///
    /// A `"ZZ"` entry inside `countries` is ignored; `defaults` wins.
    pub fn new(defaults: CountryRule, mut countries: BTreeMap<String, CountryRule>) -> Self {
        countries.remove(DEFAULTS_KEY);
        Self {
            countries,
            defaults,
        }
    }

    /// Parses a store document.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Parse`]: malformed document or invalid regex.
    /// - [`StoreError::MissingDefaults`]: no `"ZZ"` record.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let document: StoreDocument =
            serde_json::from_str(json).map_err(|e| StoreError::Parse {
                detail: e.to_string(),
            })?;
        let mut countries = document.countries;
        let defaults = countries
            .remove(DEFAULTS_KEY)
            .ok_or(StoreError::MissingDefaults)?;
        Ok(Self {
            countries,
            defaults,
        })
    }

    /// Serializes the store as pretty JSON with a trailing newline.
    ///
    /// Keys, field sets and subdivision maps are ordered, so two stores that
    /// compare equal always serialize to identical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        let mut countries = self.countries.clone();
        countries.insert(DEFAULTS_KEY.to_owned(), self.defaults.clone());
        let document = StoreDocument { countries };
        let mut json =
            serde_json::to_string_pretty(&document).map_err(|e| StoreError::Serialize {
                detail: e.to_string(),
            })?;
        json.push('\n');
        Ok(json)
    }

    /// Returns the store bundled with this crate, parsed on first use.
    ///
    /// # Errors
    ///
    /// Returns the load error if the bundled document is unusable.
    pub fn bundled() -> Result<&'static RuleStore, StoreError> {
        BUNDLED.as_ref().map_err(Clone::clone)
    }

    /// Returns `true` if `code` names a country with rules. `"ZZ"` is not a
    /// country.
    pub fn has_country(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    /// Returns the stored (unresolved) rule for `code`.
    pub fn country(&self, code: &str) -> Option<&CountryRule> {
        self.countries.get(code)
    }

    /// The `"ZZ"` defaults record.
    pub fn defaults(&self) -> &CountryRule {
        &self.defaults
    }

    /// Iterates over all country codes in ascending order.
    pub fn country_codes(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// Number of countries (excluding `"ZZ"`).
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Returns `true` when the store holds no countries.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Lists every country with its upstream name, ordered by code.
    ///
    /// Locale-aware display names and collation are left to the caller.
    pub fn list_countries(&self) -> Vec<CountrySummary> {
        self.countries
            .iter()
            .map(|(code, rule)| CountrySummary {
                code: code.clone(),
                name: rule.name.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

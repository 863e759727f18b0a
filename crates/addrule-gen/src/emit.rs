/// Assembly and serialization of the compiled store.
use std::collections::BTreeMap;

use addrule_core::{CountryRule, DEFAULTS_KEY, RuleStore};

use crate::error::GenerateError;

/// Builds a [`RuleStore`] from compiled countries keyed by code. The `"ZZ"`
/// record becomes the defaults.
///
/// # Errors
///
/// Returns [`GenerateError::MissingDefaults`] when `"ZZ"` is absent.
pub fn assemble(mut rules: BTreeMap<String, CountryRule>) -> Result<RuleStore, GenerateError> {
    let defaults = rules
        .remove(DEFAULTS_KEY)
        .ok_or(GenerateError::MissingDefaults)?;
    Ok(RuleStore::new(defaults, rules))
}

/// Serializes `store` in its canonical, byte-stable form.
///
/// # Errors
///
/// Returns [`GenerateError::Store`] if encoding fails.
pub fn render(store: &RuleStore) -> Result<String, GenerateError> {
    Ok(store.to_json_pretty()?)
}

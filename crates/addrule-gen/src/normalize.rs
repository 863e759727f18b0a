/// Pure conversions from upstream encodings to rule-store values.
///
/// Nothing here performs I/O. The override tables patch known gaps in the
/// upstream data and are consulted by [`crate::process`].
use std::collections::BTreeSet;
use std::sync::LazyLock;

use addrule_core::{DEFAULTS_KEY, Field, FieldName};
use regex::Regex;
use unic_langid::LanguageIdentifier;

use crate::error::GenerateError;

/// Field tokens of an address format template. `%n` and the other
/// presentation-only tokens are not fields.
static FORMAT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%([NOADCSZX])")
        .unwrap_or_else(|_| Regex::new(".").unwrap_or_else(|_| unreachable!("regex engine broken")))
});

/// Language used when nothing better is known.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Default languages for countries whose record has no `lang`.
pub const LANGUAGE_OVERRIDES: &[(&str, &str)] = &[
    ("AQ", "en"),
    ("AS", "en"),
    ("BQ", "nl"),
    ("BV", "nb"),
    ("CW", "nl"),
    ("DJ", "fr"),
    ("GS", "en"),
    ("HM", "en"),
    ("MV", "en"),
    ("PG", "en"),
    ("PW", "en"),
    ("TK", "en"),
    ("VU", "fr"),
    ("WS", "en"),
];

/// Replacement post-code prefixes; upstream omits the trailing space.
pub const POST_CODE_PREFIX_OVERRIDES: &[(&str, &str)] = &[("PR", "PR ")];

/// Replacement display names.
pub const NAME_OVERRIDES: &[(&str, &str)] = &[("TV", "Tuvalu")];

/// Looks `code` up in an override table.
pub fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, value)| *value)
}

// ---------------------------------------------------------------------------
// Multi-value and field encodings
// ---------------------------------------------------------------------------

/// Splits a `~`-separated upstream list. An empty string is an empty list;
/// empty items inside a non-empty list are kept so indices stay aligned.
pub fn split_multi(value: &str) -> Vec<&str> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split('~').collect()
    }
}

/// Fields referenced by `%X` tokens in an address format template.
pub fn allowed_fields(format: &str) -> BTreeSet<Field> {
    FORMAT_TOKEN
        .captures_iter(format)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().chars().next())
        .filter_map(Field::from_key)
        .collect()
}

/// Fields named by a letter-coded list such as `require` (`"ACSZ"`).
/// Unknown letters are ignored.
pub fn letter_fields(letters: &str) -> BTreeSet<Field> {
    letters.chars().filter_map(Field::from_key).collect()
}

/// Parses an optional `*_name_type` label.
///
/// # Errors
///
/// Returns [`GenerateError::UnknownFieldName`] for a non-empty label with no
/// [`FieldName`] counterpart.
pub fn field_name(context: &str, label: &str) -> Result<Option<FieldName>, GenerateError> {
    if label.is_empty() {
        return Ok(None);
    }
    FieldName::from_upstream(label)
        .map(Some)
        .ok_or_else(|| GenerateError::UnknownFieldName {
            context: context.to_owned(),
            label: label.to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Post codes
// ---------------------------------------------------------------------------

/// Anchors a subdivision post-code prefix at the start of the input.
pub fn anchored(zip: &str) -> String {
    format!("^{zip}")
}

/// Compiles `pattern` and checks every comma-separated sample against it.
///
/// # Errors
///
/// - [`GenerateError::InvalidRegex`] when the pattern does not compile.
/// - [`GenerateError::SampleMismatch`] for the first sample it rejects.
pub fn check_samples(context: &str, pattern: &str, samples: &str) -> Result<(), GenerateError> {
    let regex = Regex::new(pattern).map_err(|e| GenerateError::InvalidRegex {
        context: context.to_owned(),
        pattern: pattern.to_owned(),
        detail: e.to_string(),
    })?;
    for sample in samples.split(',').filter(|s| !s.is_empty()) {
        if !regex.is_match(sample) {
            return Err(GenerateError::SampleMismatch {
                context: context.to_owned(),
                pattern: pattern.to_owned(),
                sample: sample.to_owned(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

/// Picks the default language of `code`.
///
/// In order: the record's own `lang`, the override table, the likely language
/// of the region, [`FALLBACK_LANGUAGE`]. The `"ZZ"` defaults record has no
/// language.
pub fn default_language(code: &str, record_lang: &str) -> String {
    if code == DEFAULTS_KEY {
        return String::new();
    }
    if !record_lang.is_empty() {
        return record_lang.to_owned();
    }
    if let Some(language) = lookup(LANGUAGE_OVERRIDES, code) {
        return language.to_owned();
    }
    likely_language(code).unwrap_or_else(|| FALLBACK_LANGUAGE.to_owned())
}

/// Most likely language spoken in region `code`, from CLDR likely subtags.
pub fn likely_language(code: &str) -> Option<String> {
    let mut id: LanguageIdentifier = format!("und-{code}").parse().ok()?;
    if !id.maximize() {
        return None;
    }
    let language = id.language.as_str();
    (language != "und").then(|| language.to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

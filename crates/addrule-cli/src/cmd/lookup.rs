//! Implementation of `addrule lookup <CC> <AREA> [LOCALITY [DEPENDENT]]`.
//!
//! Resolves a subdivision ID path to its display name, in the requested
//! language when the country publishes a tree for it. `--postal-key` prints
//! the administrative area's postal key instead.
//!
//! Exit codes:
//! - 0 = found
//! - 1 = no such subdivision
//! - 2 = unknown country
use serde::Serialize;

use addrule_core::RuleStore;

use super::stream_error;
use crate::OutputFormat;
use crate::error::CliError;
use crate::format::write_json_document;

/// A parsed `lookup` invocation.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub code: &'a str,
    pub area: &'a str,
    pub locality: Option<&'a str>,
    pub dependent_locality: Option<&'a str>,
    pub language: Option<&'a str>,
    pub postal_key: bool,
}

impl Query<'_> {
    /// The ID path as typed, e.g. `KR/11/강남구`.
    fn path(&self, code: &str) -> String {
        [Some(code), Some(self.area), self.locality, self.dependent_locality]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Serialize)]
struct Answer<'a> {
    country: &'a str,
    path: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_key: Option<&'a str>,
}

/// Looks up the name (or postal key) `query` points at.
///
/// # Errors
///
/// - [`CliError::UnknownCountry`] when the store has no such country.
/// - [`CliError::SubdivisionNotFound`] when any ID on the path is unknown.
pub fn resolve<'s>(store: &'s RuleStore, query: &Query<'_>) -> Result<&'s str, CliError> {
    let code = query.code.to_uppercase();
    if !store.has_country(&code) {
        return Err(CliError::UnknownCountry { code });
    }

    let found = if query.postal_key {
        store.administrative_area_postal_key(&code, query.area)
    } else {
        match (query.locality, query.dependent_locality) {
            (None, _) => store.administrative_area_name(&code, query.area, query.language),
            (Some(locality), None) => {
                store.locality_name(&code, query.area, locality, query.language)
            }
            (Some(locality), Some(dependent)) => store.dependent_locality_name(
                &code,
                query.area,
                locality,
                dependent,
                query.language,
            ),
        }
    };

    found.ok_or_else(|| CliError::SubdivisionNotFound {
        path: query.path(&code),
    })
}

/// Runs the `lookup` command.
///
/// # Errors
///
/// See [`resolve`]; also [`CliError::IoError`] if stdout cannot be written.
pub fn run(store: &RuleStore, query: &Query<'_>, format: OutputFormat) -> Result<(), CliError> {
    let value = resolve(store, query)?;
    let mut out = std::io::stdout().lock();
    let written = match format {
        OutputFormat::Human => {
            use std::io::Write as _;
            writeln!(out, "{value}")
        }
        OutputFormat::Json => {
            let code = query.code.to_uppercase();
            let answer = Answer {
                country: &code,
                path: [Some(query.area), query.locality, query.dependent_locality]
                    .into_iter()
                    .flatten()
                    .collect(),
                language: query.language,
                name: (!query.postal_key).then_some(value),
                postal_key: query.postal_key.then_some(value),
            };
            write_json_document(&mut out, &answer)
        }
    };
    written.map_err(stream_error("stdout"))
}

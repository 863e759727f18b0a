//! Implementation of `addrule countries`.
//!
//! Lists every country in the store, one `CC  Name` line each, or a JSON
//! array of `{"code","name"}` objects.
use std::io::Write;

use addrule_core::{CountrySummary, RuleStore};

use super::stream_error;
use crate::OutputFormat;
use crate::error::CliError;
use crate::format::write_json_document;

/// Runs the `countries` command.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stdout cannot be written.
pub fn run(store: &RuleStore, format: OutputFormat) -> Result<(), CliError> {
    let countries = store.list_countries();
    let mut out = std::io::stdout().lock();
    let written = match format {
        OutputFormat::Human => write_list_human(&mut out, &countries),
        OutputFormat::Json => write_json_document(&mut out, &countries),
    };
    written.map_err(stream_error("stdout"))
}

fn write_list_human<W: Write>(w: &mut W, countries: &[CountrySummary]) -> std::io::Result<()> {
    for country in countries {
        writeln!(w, "{}  {}", country.code, country.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn one_line_per_country_without_defaults() {
        let store = RuleStore::bundled().expect("bundled");
        let mut buf = Vec::new();
        write_list_human(&mut buf, &store.list_countries()).expect("write");
        let out = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), store.len());
        assert!(lines.contains(&"DE  GERMANY"));
        assert!(!lines.iter().any(|l| l.starts_with("ZZ")));
    }
}

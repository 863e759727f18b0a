//! Implementation of `addrule validate`.
//!
//! Checks one address against the rule store and writes the violations to
//! stderr, followed by a summary line. Nothing is written to stdout.
//!
//! Exit codes:
//! - 0 = valid
//! - 1 = at least one violation
//! - 2 = the address could not be read
use addrule_core::{Address, RuleStore, validate};

use super::stream_error;
use crate::cli::AddressArgs;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_validation_summary, write_violation};
use crate::{OutputFormat, PathOrStdin};

// ---------------------------------------------------------------------------
// Address input
// ---------------------------------------------------------------------------

/// Parses a JSON address document read from `source`.
///
/// Missing keys are blank fields. The country code is upper-cased.
///
/// # Errors
///
/// Returns [`CliError::InvalidAddressInput`] when `content` is not a JSON
/// address object.
pub fn parse_address(content: &str, source: &PathOrStdin) -> Result<Address, CliError> {
    let mut address: Address =
        serde_json::from_str(content).map_err(|e| CliError::InvalidAddressInput {
            source: source_label(source),
            detail: format!("line {}, column {}: {e}", e.line(), e.column()),
        })?;
    address.country = address.country.to_uppercase();
    Ok(address)
}

/// Builds an address from the field flags.
///
/// # Errors
///
/// Returns [`CliError::MissingAddress`] when `--country` is absent.
pub fn address_from_args(args: &AddressArgs) -> Result<Address, CliError> {
    let Some(country) = args.country.as_deref() else {
        return Err(CliError::MissingAddress);
    };

    let mut builder = Address::builder()
        .country(country)
        .street_address(args.street_address.iter().cloned());
    if let Some(name) = &args.name {
        builder = builder.name(name);
    }
    if let Some(organization) = &args.organization {
        builder = builder.organization(organization);
    }
    if let Some(dependent_locality) = &args.dependent_locality {
        builder = builder.dependent_locality(dependent_locality);
    }
    if let Some(locality) = &args.locality {
        builder = builder.locality(locality);
    }
    if let Some(administrative_area) = &args.administrative_area {
        builder = builder.administrative_area(administrative_area);
    }
    if let Some(post_code) = &args.post_code {
        builder = builder.post_code(post_code);
    }
    if let Some(sorting_code) = &args.sorting_code {
        builder = builder.sorting_code(sorting_code);
    }
    Ok(builder.build())
}

fn source_label(source: &PathOrStdin) -> String {
    match source {
        PathOrStdin::Stdin => "-".to_owned(),
        PathOrStdin::Path(path) => path.display().to_string(),
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Runs the `validate` command.
///
/// # Errors
///
/// - [`CliError::ValidationErrors`] when the address has violations.
/// - [`CliError::IoError`] when stderr cannot be written.
pub fn run(
    store: &RuleStore,
    address: &Address,
    format: OutputFormat,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let result = validate(store, address);
    tracing::debug!(
        country = %address.country,
        violations = result.len(),
        "validated address"
    );

    let mut err_out = std::io::stderr().lock();
    for error in result.errors() {
        write_violation(&mut err_out, error, format, fmt_config)
            .map_err(stream_error("stderr"))?;
    }
    write_validation_summary(&mut err_out, &address.country, result.len(), format, fmt_config)
        .map_err(stream_error("stderr"))?;

    if result.is_valid() {
        Ok(())
    } else {
        Err(CliError::ValidationErrors)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::path::PathBuf;

    use super::*;

    fn stdin() -> PathOrStdin {
        PathOrStdin::Stdin
    }

    #[test]
    fn json_address_with_missing_keys() {
        let address = parse_address(r#"{"country":"de","locality":"Berlin"}"#, &stdin())
            .expect("parse");
        assert_eq!(address.country, "DE");
        assert_eq!(address.locality, "Berlin");
        assert!(address.street_address.is_empty());
    }

    #[test]
    fn malformed_json_names_the_source() {
        let source = PathOrStdin::Path(PathBuf::from("address.json"));
        let err = parse_address("{", &source).expect_err("bad json");
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("address.json"), "{}", err.message());
    }

    #[test]
    fn flags_build_the_address() {
        let args = AddressArgs {
            country: Some("us".to_owned()),
            street_address: vec!["1 Main St".to_owned(), "Apt 2".to_owned()],
            locality: Some("Springfield".to_owned()),
            administrative_area: Some("IL".to_owned()),
            post_code: Some("62701".to_owned()),
            ..AddressArgs::default()
        };
        let address = address_from_args(&args).expect("address");
        assert_eq!(address.country, "US");
        assert_eq!(address.street_address, vec!["1 Main St", "Apt 2"]);
        assert_eq!(address.administrative_area, "IL");
        assert!(address.name.is_empty());
    }

    #[test]
    fn flags_without_country_are_rejected() {
        let args = AddressArgs {
            locality: Some("Berlin".to_owned()),
            ..AddressArgs::default()
        };
        let err = address_from_args(&args).expect_err("no country");
        assert!(matches!(err, CliError::MissingAddress));
    }
}

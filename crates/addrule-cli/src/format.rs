/// Diagnostic formatting: human-readable and JSON (NDJSON) modes.
///
/// Two kinds of diagnostics reach stderr: address violations from
/// `validate` and per-country failures from `generate`.
///
/// - **Human mode** (default): one line per diagnostic with a color-coded
///   `[E]` tag. Colors are disabled when `--no-color` is set, the `NO_COLOR`
///   environment variable is present (per <https://no-color.org>), or stderr
///   is not a TTY.
/// - **JSON mode**: each diagnostic is a single-line JSON object (NDJSON).
///
/// The **quiet** flag suppresses the summary line in both modes.
use std::io::{IsTerminal as _, Write};

use addrule_core::{Field, ValidationError};
use addrule_gen::GenerateError;
use serde::Serialize;

use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the diagnostic formatter, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress the summary line.
    pub quiet: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    ///
    /// `--verbose` only raises the log level, so it is not part of the config.
    pub fn from_flags(no_color_flag: bool, quiet: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
        }
    }
}

// ---------------------------------------------------------------------------
// Address violations
// ---------------------------------------------------------------------------

/// NDJSON shape of one [`ValidationError`].
#[derive(Serialize)]
struct ViolationLine {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<Field>,
}

/// Fields named by a multi-field violation; empty for the others.
fn violation_fields(error: &ValidationError) -> &[Field] {
    match error {
        ValidationError::MissingRequiredFields { fields, .. }
        | ValidationError::UnsupportedFields { fields, .. } => fields,
        ValidationError::InvalidCountryCode
        | ValidationError::InvalidAdministrativeArea
        | ValidationError::InvalidLocality
        | ValidationError::InvalidDependentLocality
        | ValidationError::InvalidPostCode => &[],
    }
}

/// Writes a single violation in human-readable format.
///
/// Format: `[E] missing required fields:Locality,PostCode`
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_violation_human<W: Write>(
    writer: &mut W,
    error: &ValidationError,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.colors {
        writeln!(writer, "{ANSI_RED}[E]{ANSI_RESET} {error}")
    } else {
        writeln!(writer, "[E] {error}")
    }
}

/// Writes a single violation as a NDJSON line.
///
/// ```json
/// {"error":"invalid:PostCode","field":"PostCode"}
/// {"error":"missing required fields:Locality","fields":["Locality"]}
/// ```
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_violation_json<W: Write>(
    writer: &mut W,
    error: &ValidationError,
) -> std::io::Result<()> {
    let line = ViolationLine {
        error: error.to_string(),
        field: error.field().map(Field::as_str),
        fields: violation_fields(error).to_vec(),
    };
    serde_json::to_writer(&mut *writer, &line)?;
    writeln!(writer)
}

/// Writes a single violation in the requested format.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_violation<W: Write>(
    writer: &mut W,
    error: &ValidationError,
    format: OutputFormat,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => write_violation_human(writer, error, config),
        OutputFormat::Json => write_violation_json(writer, error),
    }
}

/// Writes the closing line of a `validate` run.
///
/// Human: `US: valid` or `US: 2 errors`. JSON:
/// `{"summary":{"country":"US","valid":false,"errors":2}}`. Suppressed in
/// quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_validation_summary<W: Write>(
    writer: &mut W,
    country: &str,
    errors: usize,
    format: OutputFormat,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match format {
        OutputFormat::Human if errors == 0 && config.colors => {
            writeln!(writer, "{country}: {ANSI_GREEN}valid{ANSI_RESET}")
        }
        OutputFormat::Human if errors == 0 => writeln!(writer, "{country}: valid"),
        OutputFormat::Human => writeln!(
            writer,
            "{country}: {errors} {}",
            pluralize(errors, "error", "errors")
        ),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "summary": { "country": country, "valid": errors == 0, "errors": errors }
            });
            serde_json::to_writer(&mut *writer, &summary)?;
            writeln!(writer)
        }
    }
}

// ---------------------------------------------------------------------------
// Generation failures
// ---------------------------------------------------------------------------

/// Writes one failed country of a `generate` run.
///
/// Human: `[E] KR  fetching data/KR: HTTP 404`. JSON:
/// `{"country":"KR","error":"fetching data/KR: HTTP 404","upstream":true}`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_failure<W: Write>(
    writer: &mut W,
    country: &str,
    error: &GenerateError,
    format: OutputFormat,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human if config.colors => {
            writeln!(writer, "{ANSI_RED}[E]{ANSI_RESET} {country}  {error}")
        }
        OutputFormat::Human => writeln!(writer, "[E] {country}  {error}"),
        OutputFormat::Json => {
            let line = serde_json::json!({
                "country": country,
                "error": error.to_string(),
                "upstream": error.is_upstream(),
            });
            serde_json::to_writer(&mut *writer, &line)?;
            writeln!(writer)
        }
    }
}

/// Writes the closing line of a `generate` run. Suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_generation_summary<W: Write>(
    writer: &mut W,
    compiled: usize,
    failed: usize,
    format: OutputFormat,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match format {
        OutputFormat::Human => writeln!(
            writer,
            "{compiled} {} compiled, {failed} failed",
            pluralize(compiled, "country", "countries"),
        ),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "summary": { "compiled": compiled, "failed": failed }
            });
            serde_json::to_writer(&mut *writer, &summary)?;
            writeln!(writer)
        }
    }
}

// ---------------------------------------------------------------------------
// Data output
// ---------------------------------------------------------------------------

/// Writes `value` as one pretty-printed JSON document with a trailing
/// newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json_document<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

/// Returns the singular or plural form of `word` depending on `count`.
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

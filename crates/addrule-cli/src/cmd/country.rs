//! Implementation of `addrule country <CC>`.
//!
//! Prints the rules of one country with the `ZZ` defaults applied. Human
//! mode writes an aligned key/value block; JSON mode writes the externalized
//! country document.
use std::io::Write;

use addrule_core::{CountryData, Field, FieldName, Labeled, RuleStore};

use super::stream_error;
use crate::OutputFormat;
use crate::error::CliError;
use crate::format::{pluralize, write_json_document};

/// Runs the `country` command.
///
/// # Errors
///
/// Returns [`CliError::UnknownCountry`] (exit code 2) when the store has no
/// rules for `code`.
pub fn run(store: &RuleStore, code: &str, format: OutputFormat) -> Result<(), CliError> {
    let code = code.to_uppercase();
    let data = store
        .get_country(&code)
        .ok_or(CliError::UnknownCountry { code })?;

    let mut out = std::io::stdout().lock();
    let written = match format {
        OutputFormat::Human => write_country_human(&mut out, &data),
        OutputFormat::Json => write_json_document(&mut out, &data),
    };
    written.map_err(stream_error("stdout"))
}

fn join(fields: &[Labeled<Field>]) -> String {
    fields
        .iter()
        .map(|f| f.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn label(name: Option<&Labeled<FieldName>>) -> &str {
    name.map_or("-", |l| l.display.as_str())
}

fn write_country_human<W: Write>(w: &mut W, data: &CountryData) -> std::io::Result<()> {
    writeln!(w, "{}  {}", data.id, data.name)?;
    writeln!(w, "  language         {}", or_dash(&data.default_language))?;
    writeln!(w, "  format           {}", data.format)?;
    if !data.latinized_format.is_empty() {
        writeln!(w, "  latin format     {}", data.latinized_format)?;
    }
    writeln!(w, "  required         {}", join(&data.required_fields))?;
    writeln!(w, "  allowed          {}", join(&data.allowed_fields))?;
    if !data.upper.is_empty() {
        writeln!(w, "  upper case       {}", join(&data.upper))?;
    }
    writeln!(
        w,
        "  labels           area: {}, locality: {}, dependent locality: {}, post code: {}",
        label(data.administrative_area_name_type.as_ref()),
        label(data.locality_name_type.as_ref()),
        label(data.dependent_locality_name_type.as_ref()),
        label(data.post_code_name_type.as_ref()),
    )?;
    if !data.post_code_prefix.is_empty() {
        writeln!(w, "  post code prefix {:?}", data.post_code_prefix)?;
    }
    if !data.post_code_regex.pattern().is_empty() {
        writeln!(w, "  post code        {}", data.post_code_regex.pattern())?;
    }
    let by_area = data.post_code_regex.subdivisions().len();
    if by_area > 0 {
        writeln!(
            w,
            "                   plus {by_area} {}",
            pluralize(by_area, "subdivision pattern", "subdivision patterns")
        )?;
    }
    for (language, areas) in &data.administrative_areas {
        writeln!(w, "  subdivisions     {} in {language}", areas.len())?;
    }
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

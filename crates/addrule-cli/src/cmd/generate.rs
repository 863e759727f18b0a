//! Implementation of `addrule generate`.
//!
//! Fetches every country from the upstream metadata service (or a local
//! mirror with `--from-dir`), compiles the rules with a worker pool and
//! writes the store as pretty JSON to `--output` or stdout.
//!
//! A country that fails is reported on stderr and left out. Unless
//! `--allow-failures` is given, any failure aborts the run before anything
//! is written.
use std::time::Duration;

use addrule_gen::{DirFetcher, Fetcher, Generation, Generator, GeneratorConfig, render};

use super::stream_error;
use crate::OutputFormat;
use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_failure, write_generation_summary};
use crate::io::write_output;

/// Builds the generator settings from the command-line flags.
pub fn config_from_args(args: &GenerateArgs) -> GeneratorConfig {
    let config = GeneratorConfig::default()
        .with_workers(args.workers)
        .with_fetch_timeout(Duration::from_secs(args.timeout))
        .with_fail_fast(args.fail_fast);
    match &args.upstream_url {
        Some(url) => config.with_base_url(url.as_str()),
        None => config,
    }
}

/// Runs the `generate` command.
///
/// # Errors
///
/// - [`CliError::GenerationFailed`] when the country list cannot be read or
///   the defaults record failed.
/// - [`CliError::IncompleteGeneration`] when some countries failed and
///   `--allow-failures` is not set.
/// - I/O errors writing the output.
pub fn run(
    args: &GenerateArgs,
    format: OutputFormat,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let config = config_from_args(args);
    let generation = match &args.from_dir {
        Some(dir) => {
            tracing::info!(mirror = %dir.display(), "reading upstream records from disk");
            generate(&Generator::new(config, DirFetcher::new(dir)), &args.countries)?
        }
        None => {
            tracing::info!(url = %config.base_url, "fetching upstream records");
            generate(&Generator::http(config), &args.countries)?
        }
    };

    let mut err_out = std::io::stderr().lock();
    for (code, error) in &generation.failures {
        write_failure(&mut err_out, code, error, format, fmt_config)
            .map_err(stream_error("stderr"))?;
    }
    write_generation_summary(
        &mut err_out,
        generation.rules.len(),
        generation.failures.len(),
        format,
        fmt_config,
    )
    .map_err(stream_error("stderr"))?;
    drop(err_out);

    if !generation.is_complete() && !args.allow_failures {
        return Err(CliError::IncompleteGeneration {
            countries: generation.failures.into_keys().collect(),
        });
    }

    let store = generation.into_store()?;
    let json = render(&store)?;
    write_output(args.output.as_deref(), &json)?;
    if let Some(path) = &args.output {
        tracing::info!(path = %path.display(), countries = store.len(), "wrote rule store");
    }
    Ok(())
}

fn generate<F: Fetcher>(
    generator: &Generator<F>,
    countries: &[String],
) -> Result<Generation, CliError> {
    let generation = if countries.is_empty() {
        generator.run()?
    } else {
        let codes = countries.iter().map(|c| c.to_uppercase()).collect();
        generator.run_codes(codes)?
    };
    Ok(generation)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use clap::Parser as _;

    use super::*;
    use crate::cli::{Cli, Command};

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(argv).expect("parse");
        match cli.command {
            Command::Generate(args) => args,
            Command::Validate { .. }
            | Command::Country { .. }
            | Command::Countries
            | Command::Lookup { .. } => unreachable!("parsed a generate command"),
        }
    }

    #[test]
    fn flags_reach_the_config() {
        let args = generate_args(&[
            "addrule",
            "generate",
            "--workers",
            "4",
            "--timeout",
            "5",
            "--fail-fast",
            "--upstream-url",
            "http://localhost:8080/ssl-address",
        ]);
        let config = config_from_args(&args);
        assert_eq!(config.workers, 4);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert!(config.fail_fast);
        assert_eq!(config.base_url, "http://localhost:8080/ssl-address");
    }

    #[test]
    fn zero_workers_still_runs() {
        let args = generate_args(&["addrule", "generate", "--workers", "0"]);
        assert_eq!(config_from_args(&args).workers, 1);
    }
}

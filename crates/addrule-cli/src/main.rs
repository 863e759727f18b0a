//! `addrule`: validate postal addresses and manage rule stores.
//!
//! Diagnostics and logs go to stderr; data (country rules, lookups, a
//! generated store) goes to stdout unless `--output` names a file.
//!
//! Exit codes:
//! - 0 = success
//! - 1 = negative answer (invalid address, unknown subdivision)
//! - 2 = input failure (unreadable file, bad store, failed generation)
mod cli;
mod cmd;
mod error;
mod format;
mod io;

use std::io::Write as _;
use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, OutputFormat, PathOrStdin};
use error::CliError;
use format::FormatterConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(format::colors_enabled(cli.no_color))
        .with_writer(std::io::stderr)
        .init();

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Validation diagnostics are already on stderr.
            if !matches!(e, CliError::ValidationErrors) {
                let mut err_out = std::io::stderr().lock();
                let _ignored = writeln!(err_out, "{}", e.message());
            }
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2))
        }
    }
}

/// Routes the parsed command line to its subcommand.
fn dispatch(cli: &Cli) -> Result<(), CliError> {
    let fmt_config = FormatterConfig::from_flags(cli.no_color, cli.quiet);

    match &cli.command {
        Command::Validate { input, address } => {
            let store = io::load_store(cli.store.as_deref(), cli.max_file_size)?;
            let address = match input {
                Some(source) => cmd::validate::parse_address(
                    &io::read_input(source, cli.max_file_size)?,
                    source,
                )?,
                None => cmd::validate::address_from_args(address)?,
            };
            cmd::validate::run(&store, &address, cli.format, &fmt_config)
        }
        Command::Country { code } => {
            let store = io::load_store(cli.store.as_deref(), cli.max_file_size)?;
            cmd::country::run(&store, code, cli.format)
        }
        Command::Countries => {
            let store = io::load_store(cli.store.as_deref(), cli.max_file_size)?;
            cmd::countries::run(&store, cli.format)
        }
        Command::Lookup {
            code,
            area,
            locality,
            dependent_locality,
            language,
            postal_key,
        } => {
            let store = io::load_store(cli.store.as_deref(), cli.max_file_size)?;
            let query = cmd::lookup::Query {
                code,
                area,
                locality: locality.as_deref(),
                dependent_locality: dependent_locality.as_deref(),
                language: language.as_deref(),
                postal_key: *postal_key,
            };
            cmd::lookup::run(&store, &query, cli.format)
        }
        Command::Generate(args) => cmd::generate::run(args, cli.format, &fmt_config),
    }
}

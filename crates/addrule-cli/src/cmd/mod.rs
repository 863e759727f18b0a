/// Command modules for the `addrule` CLI.
///
/// Each submodule implements one subcommand. Its `run` function takes the
/// parsed arguments and returns `Ok(())` on success or a
/// [`crate::error::CliError`] on failure.
pub mod countries;
pub mod country;
pub mod generate;
pub mod lookup;
pub mod validate;

use crate::error::CliError;

/// Wraps a failed write to stdout or stderr.
pub(crate) fn stream_error(stream: &str) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |e| CliError::IoError {
        source: stream.to_owned(),
        detail: e.to_string(),
    }
}

/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `addrule` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read, parse or
///   produce what it was asked for (missing file, bad store, unknown country,
///   failed generation).
/// - Exit code **1**: logical failure. The tool ran to completion and the
///   answer is negative (the address is invalid, the subdivision is unknown).
use std::fmt;
use std::path::PathBuf;

use addrule_gen::GenerateError;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `addrule` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a file.
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes, if known (disk files only).
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError { detail: String },

    /// A generic I/O error not covered by the more specific variants above.
    IoError { source: String, detail: String },

    /// The rule store could not be loaded.
    InvalidStore { source: String, detail: String },

    /// An `--input` document is not a JSON address.
    InvalidAddressInput { source: String, detail: String },

    /// Neither `--input` nor `--country` was given.
    MissingAddress,

    /// The country code has no rules in the store.
    UnknownCountry { code: String },

    /// The generator could not produce a store.
    GenerationFailed { detail: String },

    /// Some countries failed to compile and `--allow-failures` was not set.
    IncompleteGeneration {
        /// Codes of the failed countries, sorted.
        countries: Vec<String>,
    },

    // --- Exit code 1: logical failures ---
    /// The address violates one or more rules.
    ///
    /// The violations have already been printed; this variant exists so
    /// `main` can exit with status 1 cleanly.
    ValidationErrors,

    /// A subdivision lookup found nothing.
    SubdivisionNotFound { path: String },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidStore { .. }
            | Self::InvalidAddressInput { .. }
            | Self::MissingAddress
            | Self::UnknownCountry { .. }
            | Self::GenerationFailed { .. }
            | Self::IncompleteGeneration { .. } => 2,

            Self::ValidationErrors | Self::SubdivisionNotFound { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::InvalidStore { source, detail } => {
                format!("error: cannot load rule store {source}: {detail}")
            }
            Self::InvalidAddressInput { source, detail } => {
                format!("error: {source} is not a JSON address: {detail}")
            }
            Self::MissingAddress => {
                "error: give an address with --input or at least --country".to_owned()
            }
            Self::UnknownCountry { code } => {
                format!("error: unknown country code: {code}")
            }
            Self::GenerationFailed { detail } => {
                format!("error: generation failed: {detail}")
            }
            Self::IncompleteGeneration { countries } => {
                format!(
                    "error: {} countries failed to compile ({}); rerun with --allow-failures to write the rest",
                    countries.len(),
                    countries.join(", ")
                )
            }
            Self::ValidationErrors => "error: address is invalid".to_owned(),
            Self::SubdivisionNotFound { path } => {
                format!("error: no subdivision {path}")
            }
        }
    }
}

impl From<GenerateError> for CliError {
    fn from(e: GenerateError) -> Self {
        Self::GenerationFailed {
            detail: e.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

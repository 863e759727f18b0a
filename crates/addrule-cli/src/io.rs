/// File and stdin I/O with size enforcement and UTF-8 validation.
///
/// This module is the single place the `addrule` binary touches the
/// filesystem; `addrule-core` never does.
///
/// Key behaviours:
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - UTF-8 validation via `std::str::from_utf8` with byte-offset reporting.
/// - All I/O errors are converted to [`CliError`] variants with exit code 2.
use std::borrow::Cow;
use std::io::{ErrorKind, Read as _, Write as _};
use std::path::Path;

use addrule_core::RuleStore;

use crate::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for a missing or unreadable file, an
/// input larger than `max_size`, or invalid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Loads the rule store named by `--store`, or the bundled one.
///
/// # Errors
///
/// Returns the read error of the file, or [`CliError::InvalidStore`] when
/// the contents are not a usable store.
pub fn load_store(
    path: Option<&Path>,
    max_size: u64,
) -> Result<Cow<'static, RuleStore>, CliError> {
    let Some(path) = path else {
        return RuleStore::bundled()
            .map(Cow::Borrowed)
            .map_err(|e| CliError::InvalidStore {
                source: "(bundled)".to_owned(),
                detail: e.to_string(),
            });
    };
    let json = read_file(path, max_size)?;
    let store = RuleStore::from_json(&json).map_err(|e| CliError::InvalidStore {
        source: path.display().to_string(),
        detail: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), countries = store.len(), "loaded rule store");
    Ok(Cow::Owned(store))
}

/// Writes `content` to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) if the write fails.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|e| io_error_to_cli(&e, path)),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(content.as_bytes())
                .and_then(|()| out.flush())
                .map_err(|e| CliError::IoError {
                    source: "stdout".to_owned(),
                    detail: e.to_string(),
                })
        }
    }
}

// ---------------------------------------------------------------------------
// Disk file reading
// ---------------------------------------------------------------------------

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(&bytes, &path.display().to_string())
}

/// Maps a `std::io::Error` from a disk-file operation to a [`CliError`].
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stdin reading
// ---------------------------------------------------------------------------

/// Reads the entire stdin stream, capped at `max_size` bytes.
///
/// If the stream produces exactly `max_size` bytes one more byte is read to
/// tell "at the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let mut handle = std::io::stdin().lock();
    let mut buf: Vec<u8> = Vec::new();

    (&mut handle)
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle
            .read(&mut probe)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    bytes_to_string(&buf, "-")
}

// ---------------------------------------------------------------------------
// UTF-8 conversion
// ---------------------------------------------------------------------------

fn bytes_to_string(bytes: &[u8], source_label: &str) -> Result<String, CliError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(CliError::InvalidUtf8 {
            source: source_label.to_owned(),
            byte_offset: e.valid_up_to(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

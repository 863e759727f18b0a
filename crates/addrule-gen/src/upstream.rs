/// The upstream metadata source.
///
/// Records are addressed by path relative to the service root: `data` for the
/// country list, `data/US` for a country, `data/US--fr` for a translation and
/// `data/US/CA` (plus an optional `--lang` suffix) for a subdivision. The
/// [`Fetcher`] trait is the only way the pipeline reaches the outside world,
/// so tests and offline runs can swap the HTTP client for something else.
use std::path::PathBuf;

use crate::config::GeneratorConfig;
use crate::error::GenerateError;

/// Path of the country list record.
pub const COUNTRY_LIST_PATH: &str = "data";

/// Separator between a record path and its language suffix.
const LANGUAGE_SEPARATOR: &str = "--";

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Path of a country record.
pub fn country_path(code: &str) -> String {
    format!("{COUNTRY_LIST_PATH}/{code}")
}

/// Appends a language suffix to a record path.
pub fn language_path(path: &str, language: &str) -> String {
    format!("{path}{LANGUAGE_SEPARATOR}{language}")
}

/// Drops a `--lang` suffix (and anything after it) from a record id.
pub fn strip_language(id: &str) -> &str {
    id.split_once(LANGUAGE_SEPARATOR)
        .map_or(id, |(path, _)| path)
}

/// Path of the child record `key` below the record `parent_id`, in
/// `language` when one is given.
///
/// Upstream ids of translated records carry their language suffix
/// (`data/CA--fr`), so it is removed before descending and re-applied to the
/// child.
pub fn child_path(parent_id: &str, key: &str, language: Option<&str>) -> String {
    let path = format!("{}/{key}", strip_language(parent_id));
    match language {
        Some(language) => language_path(&path, language),
        None => path,
    }
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Source of raw upstream records.
///
/// Implementations are shared by every pool worker, hence `Send + Sync`.
pub trait Fetcher: Send + Sync {
    /// Returns the JSON body of the record at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Fetch`] when the record cannot be retrieved.
    fn fetch(&self, path: &str) -> Result<String, GenerateError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, path: &str) -> Result<String, GenerateError> {
        (**self).fetch(path)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, path: &str) -> Result<String, GenerateError> {
        (**self).fetch(path)
    }
}

/// Blocking HTTP client for the upstream service.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpFetcher {
    /// Builds a client from the base URL and timeout in `config`.
    pub fn new(config: &GeneratorConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.fetch_timeout)
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Full URL of `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<String, GenerateError> {
        let url = self.url(path);
        tracing::trace!(%url, "GET");
        let fetch_error = |detail: String| GenerateError::Fetch {
            path: path.to_owned(),
            detail,
        };
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| fetch_error(e.to_string()))?;
        response
            .into_string()
            .map_err(|e| fetch_error(e.to_string()))
    }
}

/// Reads records from a local mirror of the service.
///
/// The record at `data/US--fr` lives in `{root}/data/US--fr.json`.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// A fetcher over the mirror rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File holding the record at `path`.
    pub fn file_for(&self, path: &str) -> PathBuf {
        let mut file = self.root.join(path);
        let name = file
            .file_name()
            .map(|name| format!("{}.json", name.to_string_lossy()))
            .unwrap_or_else(|| "index.json".to_owned());
        file.set_file_name(name);
        file
    }
}

impl Fetcher for DirFetcher {
    fn fetch(&self, path: &str) -> Result<String, GenerateError> {
        let file = self.file_for(path);
        std::fs::read_to_string(&file).map_err(|e| GenerateError::Fetch {
            path: path.to_owned(),
            detail: format!("{}: {e}", file.display()),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

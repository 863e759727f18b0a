/// Generator configuration.
use std::time::Duration;

/// Root of the upstream address metadata service.
pub const DEFAULT_BASE_URL: &str = "https://chromium-i18n.appspot.com/ssl-address";

/// Number of countries compiled concurrently.
pub const DEFAULT_WORKERS: usize = 25;

/// Per-request timeout applied by [`crate::HttpFetcher`].
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Base URL; record paths such as `data/US` are appended after a `/`.
    pub base_url: String,
    /// Size of the worker pool. Always at least 1.
    pub workers: usize,
    /// Timeout for a single upstream request.
    pub fetch_timeout: Duration,
    /// Stop dispatching new countries after the first failure.
    pub fail_fast: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            fail_fast: false,
        }
    }
}

impl GeneratorConfig {
    /// Sets the service root; a trailing `/` is optional.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the pool size; `0` is raised to `1`.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Stops handing out work after the first failed country.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

//! Client configuration
//!
//! Holds the service address, the credential and transport settings.

use crate::error::{JingongoError, Result};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Client Configuration Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via JINGONGO_API_TIMEOUT_SECS environment variable.
/// Bounds each API call and every connection attempt. Archive uploads and FMU
/// downloads through signed URLs have no overall deadline.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 300;

/// Environment variable holding the service base URL
pub const ENV_API_BASE_URL: &str = "JINGONGO_API_BASE_URL";

/// Environment variable holding the long-lived API key
pub const ENV_API_KEY: &str = "JINGONGO_API_KEY";

/// Environment variable overriding the request timeout
pub const ENV_API_TIMEOUT_SECS: &str = "JINGONGO_API_TIMEOUT_SECS";

/// Settings used to construct a [`Client`](crate::Client)
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
    verbose: bool,
    show_progress: bool,
}

impl ClientConfig {
    /// Create a config from a base URL and API key
    ///
    /// A trailing `/` on the base URL is removed so endpoint paths can be
    /// appended directly.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            verbose: false,
            show_progress: false,
        }
    }

    /// Load config from environment variables
    ///
    /// Missing variables are left empty and reported by [`validate`](Self::validate)
    /// when the client is constructed.
    pub fn from_env() -> Self {
        let base_url = std::env::var(ENV_API_BASE_URL).unwrap_or_default();
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();

        let mut config = Self::new(base_url, api_key);

        if let Some(secs) = std::env::var(ENV_API_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Install an info-level console subscriber on connect if none exists
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Draw progress bars for downloads
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check that both the base URL and the API key are present
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() || self.api_key.trim().is_empty() {
            return Err(JingongoError::validation(
                "API base URL and API key must be provided",
            ));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn shows_progress(&self) -> bool {
        self.show_progress
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .field("show_progress", &self.show_progress)
            .finish()
    }
}

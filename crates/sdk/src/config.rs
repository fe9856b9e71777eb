//! Configuration types for the ExpenseLM SDK.

use std::time::Duration;
use url::Url;

/// Production ExpenseLM API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.expenselm.ai";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the ExpenseLM client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the ExpenseLM API. Always ends with `/`.
    pub base_url: Url,
    /// API key sent with every request.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL and API key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Keeps any path prefix of the base URL when joining relative paths
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// Environment configuration for the MCP server

use expenselm_sdk::{ExpenseLmClient, ExpenseLmResult, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use std::time::Duration;
use url::Url;

pub const API_KEY_VAR: &str = "EXPENSELM_API_KEY";
pub const TIMEOUT_VAR: &str = "MCP_TIMEOUT";
pub const ENDPOINT_VAR: &str = "EXPENSELM_API_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("EXPENSELM_API_KEY is not set; add it to the env block of this server in your MCP client configuration")]
    MissingApiKey,

    #[error("MCP_TIMEOUT must be a positive number of milliseconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("EXPENSELM_API_ENDPOINT must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),
}

/// Settings read once at startup and immutable afterwards
#[derive(Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub endpoint: Url,
    /// Upper bound for a single tool call, including its HTTP request
    pub timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let timeout = match non_blank(lookup(TIMEOUT_VAR)) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        let endpoint_raw =
            non_blank(lookup(ENDPOINT_VAR)).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = match Url::parse(&endpoint_raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return Err(ConfigError::InvalidEndpoint(endpoint_raw)),
        };

        Ok(Self {
            api_key,
            endpoint,
            timeout,
        })
    }

    /// Build the API client this configuration describes.
    pub fn build_client(&self) -> ExpenseLmResult<ExpenseLmClient> {
        ExpenseLmClient::builder()
            .base_url(self.endpoint.as_str())
            .api_key(self.api_key.clone())
            .timeout(self.timeout)
            .build()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

//! Main client for the ExpenseLM SDK.

use crate::api::*;
use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::{ExpenseLmError, ExpenseLmResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for interacting with the ExpenseLM API.
///
/// Cloning is cheap; clones share configuration and the connection pool.
#[derive(Debug, Clone)]
pub struct ExpenseLmClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl ExpenseLmClient {
    /// Create a new client builder.
    pub fn builder() -> ExpenseLmClientBuilder {
        ExpenseLmClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> ExpenseLmResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Get the expenses API.
    pub fn expenses(&self) -> ExpensesApi<'_> {
        ExpensesApi::new(self)
    }

    /// Get the subscriptions API.
    pub fn subscriptions(&self) -> SubscriptionsApi<'_> {
        SubscriptionsApi::new(self)
    }

    /// Get the statistics API.
    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(self)
    }
}

/// Builder for creating an ExpenseLmClient.
pub struct ExpenseLmClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ExpenseLmClientBuilder {
    /// Create a new builder pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL of the ExpenseLM API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> ExpenseLmResult<ExpenseLmClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ExpenseLmError::Config("api_key is required".to_string()))?;

        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ExpenseLmError::Config(format!(
                "base_url must use http or https, got {}",
                base_url.scheme()
            )));
        }

        if self.timeout.is_zero() {
            return Err(ExpenseLmError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let mut config = ClientConfig::new(base_url, api_key);
        config.timeout = self.timeout;

        ExpenseLmClient::from_config(config)
    }
}

impl Default for ExpenseLmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

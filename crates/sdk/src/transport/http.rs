//! HTTP transport layer for the ExpenseLM SDK.

use crate::config::ClientConfig;
use crate::error::{ExpenseLmError, ExpenseLmResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Header the ExpenseLM API reads the API key from.
pub const API_KEY_HEADER: &str = "expenselm_api_key";

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> ExpenseLmResult<Self> {
        let mut headers = header::HeaderMap::new();

        let mut api_key = header::HeaderValue::from_str(&config.api_key)
            .map_err(|_| ExpenseLmError::Config("Invalid API key format".to_string()))?;
        api_key.set_sensitive(true);

        let mut bearer = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ExpenseLmError::Config("Invalid API key format".to_string()))?;
        bearer.set_sensitive(true);

        headers.insert(header::HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(header::AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("expenselm-sdk/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path, relative to the base URL.
    fn build_url(&self, path: &str) -> ExpenseLmResult<Url> {
        Ok(self.config.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a URL from path segments, percent-encoding each one.
    fn build_segment_url(&self, segments: &[&str]) -> ExpenseLmResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ExpenseLmError::Config("Base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and turn non-success statuses into typed errors.
    async fn execute(&self, request_builder: RequestBuilder) -> ExpenseLmResult<Response> {
        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ExpenseLmError::Timeout
            } else {
                ExpenseLmError::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_secs = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        debug!(status = status.as_u16(), "Request failed");
        Err(ExpenseLmError::from_response(
            status.as_u16(),
            &body,
            retry_after_secs,
        ))
    }

    /// Read the body and decode it as JSON.
    async fn decode<T: DeserializeOwned>(response: Response) -> ExpenseLmResult<T> {
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ExpenseLmError::Timeout
            } else {
                ExpenseLmError::Http(e)
            }
        })?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Execute a GET request for a resource addressed by path segments.
    pub async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> ExpenseLmResult<T> {
        let url = self.build_segment_url(segments)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url)).await?;
        Self::decode(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ExpenseLmResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        let response = self.execute(self.client.get(url).query(query)).await?;
        Self::decode(response).await
    }
}

//! Error types for the ExpenseLM SDK.

use serde::Deserialize;

/// Result type for SDK operations.
pub type ExpenseLmResult<T> = Result<T, ExpenseLmError>;

/// Error types that can occur when calling the ExpenseLM API.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseLmError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The API key was rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ExpenseLmError {
    /// Short, stable label for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "transport",
            Self::Api { .. } => "upstream",
            Self::Config(_) => "config",
            Self::Json(_) => "decode",
            Self::Timeout => "timeout",
            Self::Authentication(_) => "authentication",
            Self::NotFound(_) => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }

    /// Create an error from a non-success status code and response body.
    pub fn from_response(status: u16, body: &str, retry_after_secs: Option<u64>) -> Self {
        let (message, details) = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => parsed.into_parts(),
            Err(_) if body.trim().is_empty() => (default_message(status), None),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 | 403 => Self::Authentication(message),
            404 => Self::NotFound(message),
            429 => Self::RateLimited { retry_after_secs },
            _ => Self::Api {
                status,
                message,
                details,
            },
        }
    }
}

fn default_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}

/// Error body returned by the ExpenseLM API.
///
/// The API reports failures as `{"detail": ...}` where `detail` is either a
/// message or a list of validation errors; `{"error": ...}` is also accepted.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub detail: serde_json::Value,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn into_parts(self) -> (String, Option<String>) {
        match self.detail {
            serde_json::Value::String(message) => (message, self.details),
            other => ("Request rejected".to_string(), Some(other.to_string())),
        }
    }
}

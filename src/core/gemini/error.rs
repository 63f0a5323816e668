//! Error types for Gemini calls.

use thiserror::Error;

/// Result type alias for Gemini operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur while calling the Gemini API or interpreting its
/// output.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected structure.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model output was not JSON and contained no recoverable JSON block.
    #[error("Could not parse JSON from model output: {0}")]
    Parse(String),

    /// Client was built without an API key.
    #[error("Gemini client not configured: {0}")]
    NotConfigured(String),
}

impl GeminiError {
    /// Whether this failure is a rate-limit/quota rejection, detected by
    /// status code or by message keyword: such errors are retried with
    /// backoff and surfaced with capacity-specific messaging.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::Api { status: 429, .. } => true,
            Self::Http(e) if e.status().map(|s| s.as_u16()) == Some(429) => true,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("quota")
                    || message.contains("rate limit")
                    || message.contains("exhausted")
            }
        }
    }

    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response carrying the service's `{"error", "code"}` body
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        /// Seconds from a `Retry-After` header, if the service sent one
        retry_after: Option<u64>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Job {id} failed: {reason}")]
    JobFailed { id: String, reason: String },

    #[error("Timed out waiting for job {0}")]
    Timeout(String),
}

impl SdkError {
    /// Error code reported by the service, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            SdkError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether resubmitting later may succeed (queue full, rate limited)
    pub fn is_retryable(&self) -> bool {
        matches!(self.code(), Some("QUEUE_FULL") | Some("THROTTLED"))
    }
}

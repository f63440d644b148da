// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Queue buffer stayed full for the whole admission window (retryable)
    #[error("Queue full: {0}")]
    QueueFull(String),

    #[error("Shutting down: {0}")]
    ShuttingDown(String),

    #[error("Render error: {0}")]
    Produce(#[from] crate::port::ProduceError),
}

impl AppError {
    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::QueueFull(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

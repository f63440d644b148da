//! HTTP Error Types
//!
//! Maps application errors to status codes and the JSON error body
//! `{"error": "...", "code": "..."}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use genart_core::domain::DomainError;
use genart_core::error::AppError;
use genart_core::port::ProduceError;

/// Error codes carried in the `code` field
pub mod code {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const THROTTLED: &str = "THROTTLED";
    pub const QUEUE_FULL: &str = "QUEUE_FULL";
    pub const SHUTTING_DOWN: &str = "SHUTTING_DOWN";
    pub const JOB_FAILED: &str = "JOB_FAILED";
    pub const ARTIFACT_UNAVAILABLE: &str = "ARTIFACT_UNAVAILABLE";
    pub const RENDER_FAILED: &str = "RENDER_FAILED";
}

/// Polling responses must never be cached: the same URL changes content
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Seconds a client should wait before resubmitting after QUEUE_FULL
pub const RETRY_AFTER_SECS: &str = "1";

/// Handler-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Rate limit exceeded. Please slow down.")]
    Throttled,

    /// The job finished with a failure marker
    #[error("{0}")]
    JobFailed(String),

    /// The stored handle points at a file that cannot be read
    #[error("Artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    /// Direct draw failed in the producer
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Convenience type alias for handler return values
pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::App(AppError::Domain(e))
    }
}

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::App(app) => classify_app_error(app),
            ApiError::Throttled => (
                StatusCode::TOO_MANY_REQUESTS,
                code::THROTTLED,
                self.to_string(),
            ),
            ApiError::JobFailed(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                code::JOB_FAILED,
                reason.clone(),
            ),
            ApiError::ArtifactUnavailable(msg) => {
                tracing::error!(error = %msg, "Stored artifact unreadable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code::ARTIFACT_UNAVAILABLE,
                    self.to_string(),
                )
            }
            ApiError::RenderFailed(msg) => {
                tracing::error!(error = %msg, "Direct draw failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code::RENDER_FAILED,
                    self.to_string(),
                )
            }
        }
    }
}

fn classify_app_error(err: &AppError) -> (StatusCode, &'static str, String) {
    match err {
        AppError::Domain(DomainError::UnknownGenerator(_)) => {
            (StatusCode::NOT_FOUND, code::NOT_FOUND, err.to_string())
        }
        AppError::Domain(_) => (
            StatusCode::BAD_REQUEST,
            code::VALIDATION_ERROR,
            err.to_string(),
        ),
        AppError::Conflict(_) => (StatusCode::CONFLICT, code::CONFLICT, err.to_string()),
        AppError::QueueFull(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            code::QUEUE_FULL,
            err.to_string(),
        ),
        AppError::ShuttingDown(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            code::SHUTTING_DOWN,
            err.to_string(),
        ),
        AppError::Produce(ProduceError::UnknownGenerator(_)) => {
            (StatusCode::NOT_FOUND, code::NOT_FOUND, err.to_string())
        }
        AppError::Produce(e) => {
            tracing::error!(error = %e, "Producer error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                code::RENDER_FAILED,
                err.to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });
        let mut response = (status, Json(body)).into_response();

        let headers = response.headers_mut();
        match &self {
            ApiError::App(AppError::QueueFull(_)) => {
                headers.insert(
                    header::RETRY_AFTER,
                    HeaderValue::from_static(RETRY_AFTER_SECS),
                );
            }
            ApiError::JobFailed(_) | ApiError::ArtifactUnavailable(_) => {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
            }
            _ => {}
        }
        response
    }
}

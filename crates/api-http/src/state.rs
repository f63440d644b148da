use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;

use genart_core::application::{PoolMonitor, SubmissionService};
use genart_core::port::ArtifactProducer;

use crate::rate_limiter::RateLimiter;

/// HTTP-facing settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host (and port) used in polling URLs when a request has no Host header
    pub public_host: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            public_host: "localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Image served while a job is still pending
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub bytes: Bytes,
    pub media_type: &'static str,
}

impl Placeholder {
    pub fn new(bytes: impl Into<Bytes>, media_type: &'static str) -> Self {
        Self {
            bytes: bytes.into(),
            media_type,
        }
    }
}

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Submission, status and listing use cases
    pub service: Arc<SubmissionService>,
    /// Used directly by the synchronous draw endpoint
    pub producer: Arc<dyn ArtifactProducer>,
    pub placeholder: Arc<Placeholder>,
    /// Worker pool view for /health (absent when no pool runs in-process)
    pub pool: Option<PoolMonitor>,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<ApiConfig>,
}

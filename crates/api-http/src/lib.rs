//! HTTP API Layer
//!
//! REST surface of the Genart job service: direct draws, asynchronous job
//! submission and polling, listings and health.

pub mod error;
pub mod handlers;
pub mod rate_limiter;
pub mod router;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use rate_limiter::RateLimiter;
pub use router::build_router;
pub use state::{ApiConfig, AppState, Placeholder};

//! Synchronous draw: render on the request path, no queue, nothing stored.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use genart_core::application::worker::join_error_to_produce_error;
use genart_core::error::AppError;
use genart_core::port::ProduceError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /image/{generator}
// ---------------------------------------------------------------------------

/// Render a fresh artifact and return its bytes.
pub async fn draw(
    State(state): State<AppState>,
    Path(generator): Path<String>,
) -> ApiResult<Response> {
    state.service.registry().ensure_known(&generator)?;

    let producer = Arc::clone(&state.producer);
    let name = generator.clone();
    let handle = tokio::task::spawn_blocking(move || producer.produce(&name))
        .await
        .map_err(|e| ApiError::RenderFailed(join_error_to_produce_error(e).to_string()))?
        .map_err(|e| match e {
            ProduceError::UnknownGenerator(_) => ApiError::App(AppError::Produce(e)),
            other => ApiError::RenderFailed(other.to_string()),
        })?;

    let bytes = tokio::fs::read(handle.path())
        .await
        .map_err(|e| ApiError::RenderFailed(format!("{}: {}", handle, e)))?;

    debug!(generator = %generator, size = bytes.len(), "Direct draw served");
    Ok(([(header::CONTENT_TYPE, handle.media_type())], bytes).into_response())
}

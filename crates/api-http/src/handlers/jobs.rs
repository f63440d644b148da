//! Asynchronous job endpoints: submit, poll, status.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use genart_core::domain::{JobId, JobStatus};

use crate::error::{ApiError, ApiResult, NO_CACHE};
use crate::handlers::polling_url;
use crate::state::AppState;
use crate::types::{JobStatusResponse, SubmitResponse};

// ---------------------------------------------------------------------------
// GET /new/{generator}
// ---------------------------------------------------------------------------

/// Queue a render and answer immediately with the id and polling URL.
pub async fn submit(
    State(state): State<AppState>,
    Path(generator): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<SubmitResponse>> {
    // Unknown names are rejected before they cost a token
    state.service.registry().ensure_known(&generator)?;

    if !state.rate_limiter.try_acquire() {
        return Err(ApiError::Throttled);
    }

    // A rejected admission does not spend the token
    let job = match state.service.submit(&generator).await {
        Ok(job) => job,
        Err(e) => {
            state.rate_limiter.release();
            return Err(e.into());
        }
    };
    let url = polling_url(&headers, &state.config, &job.id);

    Ok(Json(SubmitResponse {
        id: job.id.to_string(),
        url,
    }))
}

// ---------------------------------------------------------------------------
// GET /new/load/{id}
// ---------------------------------------------------------------------------

/// Artifact bytes once ready, the placeholder until then.
pub async fn load(State(state): State<AppState>, Path(raw_id): Path<String>) -> ApiResult<Response> {
    let id = JobId::parse(&raw_id)?;

    match state.service.status(&id).await? {
        JobStatus::Pending => {
            debug!(job_id = %id, "Serving placeholder");
            let placeholder = &state.placeholder;
            Ok((
                [
                    (header::CONTENT_TYPE, placeholder.media_type),
                    (header::CACHE_CONTROL, NO_CACHE),
                ],
                placeholder.bytes.clone(),
            )
                .into_response())
        }
        JobStatus::Ready(handle) => {
            let bytes = tokio::fs::read(handle.path())
                .await
                .map_err(|e| ApiError::ArtifactUnavailable(format!("{}: {}", handle, e)))?;
            Ok(([(header::CONTENT_TYPE, handle.media_type())], bytes).into_response())
        }
        JobStatus::Failed(reason) => Err(ApiError::JobFailed(reason)),
    }
}

// ---------------------------------------------------------------------------
// GET /new/status/{id}
// ---------------------------------------------------------------------------

/// Tri-state status as JSON, without the image bytes.
pub async fn status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = JobId::parse(&raw_id)?;
    let status = state.service.status(&id).await?;

    let error = match &status {
        JobStatus::Failed(reason) => Some(reason.clone()),
        _ => None,
    };
    let body = JobStatusResponse {
        id: id.to_string(),
        state: status.as_str(),
        error,
    };

    Ok(([(header::CACHE_CONTROL, NO_CACHE)], Json(body)).into_response())
}

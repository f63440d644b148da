use axum::extract::State;
use axum::Json;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /health -- liveness plus job and pool counters.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let completed_jobs = state.service.completed_count().await?;
    let submitted_jobs = state.service.submitted_count().await?;
    let (workers, busy_workers) = state
        .pool
        .as_ref()
        .map(|pool| (pool.size(), pool.busy()))
        .unwrap_or((0, 0));

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        completed_jobs,
        submitted_jobs,
        workers,
        busy_workers,
        queue_depth: state.service.queue().depth(),
    }))
}

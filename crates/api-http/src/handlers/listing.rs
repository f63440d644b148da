use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::error::ApiResult;
use crate::handlers::polling_url;
use crate::state::AppState;
use crate::types::{GeneratorsResponse, JobRow, JobsTableResponse};

/// GET /list/simple -- known generator names, sorted.
pub async fn list_generators(State(state): State<AppState>) -> Json<GeneratorsResponse> {
    Json(GeneratorsResponse {
        generators: state.service.registry().names(),
    })
}

/// GET /generated-images-table -- every accepted submission in log order.
pub async fn jobs_table(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<JobsTableResponse>> {
    let jobs = state
        .service
        .submissions()
        .await?
        .into_iter()
        .map(|record| JobRow {
            url: polling_url(&headers, &state.config, &record.id),
            id: record.id.to_string(),
            generator: record.generator,
            submitted_at: record.submitted_at,
        })
        .collect();

    Ok(Json(JobsTableResponse { jobs }))
}

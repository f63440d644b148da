//! HTTP Response Types
//!
//! JSON bodies returned by the listing, submission, status and health endpoints.

use serde::Serialize;

/// GET /list/simple
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorsResponse {
    pub generators: Vec<String>,
}

/// GET /new/{generator}
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub id: String,
    /// Polling URL for this job
    pub url: String,
}

/// GET /new/status/{id}
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One row of GET /generated-images-table
#[derive(Debug, Clone, Serialize)]
pub struct JobRow {
    pub id: String,
    pub generator: String,
    pub submitted_at: i64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobsTableResponse {
    pub jobs: Vec<JobRow>,
}

/// GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub completed_jobs: usize,
    pub submitted_jobs: usize,
    pub workers: usize,
    pub busy_workers: usize,
    pub queue_depth: usize,
}

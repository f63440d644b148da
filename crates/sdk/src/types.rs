//! SDK Request/Response Types
//!
//! Mirrors the JSON bodies served by the HTTP API.

use serde::{Deserialize, Serialize};

/// Response from GET /list/simple
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorList {
    pub generators: Vec<String>,
}

/// Response from a job submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
    /// Polling URL for the job
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Ready,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Ready => "ready",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Response from GET /new/status/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    pub id: String,
    pub state: JobState,
    #[serde(default)]
    pub error: Option<String>,
}

/// One submitted job from GET /generated-images-table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRow {
    pub id: String,
    pub generator: String,
    pub submitted_at: i64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsTable {
    pub jobs: Vec<JobRow>,
}

/// Response from GET /health
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub completed_jobs: usize,
    pub submitted_jobs: usize,
    pub workers: usize,
    #[serde(default)]
    pub busy_workers: usize,
    #[serde(default)]
    pub queue_depth: usize,
}

/// Image bytes with the media type the service reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl Image {
    /// File extension matching the media type
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Result of one poll of GET /new/load/{id}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Not finished yet; carries the placeholder image
    Pending(Image),
    Ready(Image),
    Failed(String),
}

/// `{"error", "code"}` body of every error response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub code: String,
}

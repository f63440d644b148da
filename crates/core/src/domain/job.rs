// Job Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::{DomainError, Result};

/// Generator name (selects which drawing routine the producer runs)
pub type GeneratorName = String;

/// Longest identifier accepted from the outside world
pub const MAX_JOB_ID_LEN: usize = 128;

/// Job identifier, unique for the life of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap an identifier produced by an `IdProvider`
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an identifier received from a client (path segment, CLI argument)
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(DomainError::InvalidJobId("identifier is empty".to_string()));
        }
        if raw.len() > MAX_JOB_ID_LEN {
            return Err(DomainError::InvalidJobId(format!(
                "identifier longer than {} characters",
                MAX_JOB_ID_LEN
            )));
        }
        if raw.chars().any(|c| c.is_control() || c == '/') {
            return Err(DomainError::InvalidJobId(format!(
                "identifier contains forbidden characters: {:?}",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of a produced artifact (a file on disk)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactHandle(PathBuf);

impl ArtifactHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Media type derived from the file extension
    pub fn media_type(&self) -> &'static str {
        match self
            .0
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One asynchronous render request.
///
/// Immutable once built; moved through the queue as a typed value and consumed
/// by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub id: JobId,
    pub generator: GeneratorName,
    pub submitted_at: i64, // epoch ms
}

impl JobDescriptor {
    /// Create a descriptor with injected id and timestamp
    pub fn new(id: JobId, generator: impl Into<String>, submitted_at: i64) -> Self {
        Self {
            id,
            generator: generator.into(),
            submitted_at,
        }
    }
}

/// Stored result of a finished job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum JobOutcome {
    Ready(ArtifactHandle),
    Failed(String),
}

/// What a lookup reports. `Pending` is the absence of an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Ready(ArtifactHandle),
    Failed(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Ready(_) => "ready",
            JobStatus::Failed(_) => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Pending)
    }
}

impl From<Option<JobOutcome>> for JobStatus {
    fn from(outcome: Option<JobOutcome>) -> Self {
        match outcome {
            None => JobStatus::Pending,
            Some(JobOutcome::Ready(handle)) => JobStatus::Ready(handle),
            Some(JobOutcome::Failed(reason)) => JobStatus::Failed(reason),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry in the append-only submission log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: JobId,
    pub generator: GeneratorName,
    pub submitted_at: i64,
}

impl From<&JobDescriptor> for SubmissionRecord {
    fn from(job: &JobDescriptor) -> Self {
        Self {
            id: job.id.clone(),
            generator: job.generator.clone(),
            submitted_at: job.submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_id_rejects_empty_and_slashes() {
        assert!(JobId::parse("").is_err());
        assert!(JobId::parse("a/b").is_err());
        assert!(JobId::parse(&"x".repeat(MAX_JOB_ID_LEN + 1)).is_err());
        assert_eq!(JobId::parse("123").unwrap().as_str(), "123");
    }

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(ArtifactHandle::new("maze_1.png").media_type(), "image/png");
        assert_eq!(ArtifactHandle::new("loading.JPG").media_type(), "image/jpeg");
        assert_eq!(
            ArtifactHandle::new("noext").media_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_status_from_outcome() {
        assert_eq!(JobStatus::from(None), JobStatus::Pending);
        let handle = ArtifactHandle::new("a.png");
        assert_eq!(
            JobStatus::from(Some(JobOutcome::Ready(handle.clone()))),
            JobStatus::Ready(handle)
        );
        assert_eq!(
            JobStatus::from(Some(JobOutcome::Failed("boom".into()))).as_str(),
            "failed"
        );
    }
}

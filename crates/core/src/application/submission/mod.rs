// Submission Service - core use cases for asynchronous render jobs

pub mod submit;

use crate::application::queue::JobQueue;
use crate::domain::{GeneratorRegistry, JobDescriptor, JobId, JobStatus, SubmissionRecord};
use crate::error::Result;
use crate::port::{lookup, IdProvider, ResultStore, SubmissionLog, TimeProvider};
use std::sync::Arc;

/// Submission Service
///
/// Owns the write path (submit) and the read paths (status, listing) shared
/// by the HTTP layer.
pub struct SubmissionService {
    queue: JobQueue,
    registry: Arc<GeneratorRegistry>,
    results: Arc<dyn ResultStore>,
    log: Arc<dyn SubmissionLog>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SubmissionService {
    pub fn new(
        queue: JobQueue,
        registry: Arc<GeneratorRegistry>,
        results: Arc<dyn ResultStore>,
        log: Arc<dyn SubmissionLog>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            queue,
            registry,
            results,
            log,
            id_provider,
            time_provider,
        }
    }

    /// Validate, enqueue and log a new job; never waits for it to run
    pub async fn submit(&self, generator: &str) -> Result<JobDescriptor> {
        submit::execute(
            &self.queue,
            &self.registry,
            self.log.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            generator,
        )
        .await
    }

    /// Pending / ready / failed for `id`
    pub async fn status(&self, id: &JobId) -> Result<JobStatus> {
        lookup(self.results.as_ref(), id).await
    }

    /// Every accepted submission in log order
    pub async fn submissions(&self) -> Result<Vec<SubmissionRecord>> {
        self.log.list().await
    }

    pub async fn submitted_count(&self) -> Result<usize> {
        self.log.len().await
    }

    pub async fn completed_count(&self) -> Result<usize> {
        self.results.len().await
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }
}

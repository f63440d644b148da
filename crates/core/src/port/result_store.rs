// Result Store Port (Interface)

use crate::domain::{JobId, JobOutcome, JobStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Concurrent job id -> outcome mapping.
///
/// Entries are write-once: the first `put` for an id wins and later writes
/// for the same id fail with `AppError::Conflict` without touching the stored
/// value. Readers see either no entry or the complete outcome.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Record the outcome of a finished job
    async fn put(&self, id: &JobId, outcome: JobOutcome) -> Result<()>;

    /// Outcome for `id`, `None` while the job is pending or unknown
    async fn get(&self, id: &JobId) -> Result<Option<JobOutcome>>;

    /// Number of finished jobs
    async fn len(&self) -> Result<usize>;
}

/// Fold a store lookup into the pending/ready/failed tri-state
pub async fn lookup(store: &dyn ResultStore, id: &JobId) -> Result<JobStatus> {
    Ok(JobStatus::from(store.get(id).await?))
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mutex'd HashMap store for core tests
    #[derive(Default)]
    pub struct InMemoryResultStore {
        entries: Mutex<HashMap<JobId, JobOutcome>>,
    }

    impl InMemoryResultStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ResultStore for InMemoryResultStore {
        async fn put(&self, id: &JobId, outcome: JobOutcome) -> Result<()> {
            let mut entries = self.entries.lock().unwrap();
            if entries.contains_key(id) {
                return Err(AppError::Conflict(format!("outcome for job {} already stored", id)));
            }
            entries.insert(id.clone(), outcome);
            Ok(())
        }

        async fn get(&self, id: &JobId) -> Result<Option<JobOutcome>> {
            Ok(self.entries.lock().unwrap().get(id).cloned())
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.entries.lock().unwrap().len())
        }
    }
}

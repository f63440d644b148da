// DashMap-backed ResultStore

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use genart_core::domain::{JobId, JobOutcome};
use genart_core::error::{AppError, Result};
use genart_core::port::ResultStore;
use tracing::warn;

/// Sharded concurrent map of finished jobs.
///
/// `put` goes through the entry API so check-and-insert happens under one
/// shard lock: two writers for the same id cannot both succeed.
#[derive(Default)]
pub struct MemoryResultStore {
    entries: DashMap<JobId, JobOutcome>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn put(&self, id: &JobId, outcome: JobOutcome) -> Result<()> {
        match self.entries.entry(id.clone()) {
            Entry::Occupied(_) => {
                warn!(job_id = %id, "Ignoring second outcome for job");
                Err(AppError::Conflict(format!(
                    "outcome for job {} already stored",
                    id
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(outcome);
                Ok(())
            }
        }
    }

    async fn get(&self, id: &JobId) -> Result<Option<JobOutcome>> {
        Ok(self.entries.get(id).map(|entry| entry.value().clone()))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genart_core::domain::ArtifactHandle;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_on_unknown_id_is_none() {
        let store = MemoryResultStore::new();
        assert!(store.get(&JobId::new("nope")).await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_first_write_wins_and_reads_are_stable() {
        let store = MemoryResultStore::new();
        let id = JobId::new("42");
        let first = JobOutcome::Ready(ArtifactHandle::new("maze_1.png"));

        store.put(&id, first.clone()).await.unwrap();
        let err = store
            .put(&id, JobOutcome::Ready(ArtifactHandle::new("maze_2.png")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        for _ in 0..3 {
            assert_eq!(store.get(&id).await.unwrap(), Some(first.clone()));
        }
    }

    #[tokio::test]
    async fn test_concurrent_writers_and_readers() {
        let store = Arc::new(MemoryResultStore::new());

        let mut handles = vec![];
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let id = JobId::new(i.to_string());
                let handle = ArtifactHandle::new(format!("img_{}.png", i));
                store.put(&id, JobOutcome::Ready(handle.clone())).await.unwrap();
                // A reader racing the writer sees nothing or the whole value
                assert_eq!(
                    store.get(&id).await.unwrap(),
                    Some(JobOutcome::Ready(handle))
                );
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.len().await.unwrap(), 64);
    }

    #[tokio::test]
    async fn test_racing_writers_for_one_id_store_exactly_one() {
        let store = Arc::new(MemoryResultStore::new());
        let id = JobId::new("contended");

        let mut handles = vec![];
        for i in 0..16 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .put(&id, JobOutcome::Failed(format!("writer {}", i)))
                    .await
                    .is_ok()
            }));
        }
        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}

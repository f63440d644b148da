// RwLock'd Vec SubmissionLog

use async_trait::async_trait;
use genart_core::domain::SubmissionRecord;
use genart_core::error::Result;
use genart_core::port::SubmissionLog;
use parking_lot::RwLock;

/// Append-only list of accepted submissions
#[derive(Default)]
pub struct MemorySubmissionLog {
    records: RwLock<Vec<SubmissionRecord>>,
}

impl MemorySubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionLog for MemorySubmissionLog {
    async fn append(&self, record: SubmissionRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SubmissionRecord>> {
        Ok(self.records.read().clone())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

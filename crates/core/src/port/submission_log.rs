// Submission Log Port (Interface)

use crate::domain::SubmissionRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Append-only record of every accepted submission.
///
/// Concurrent appends must never lose entries; relative order between two
/// concurrent submissions is not specified.
#[async_trait]
pub trait SubmissionLog: Send + Sync {
    async fn append(&self, record: SubmissionRecord) -> Result<()>;

    /// All records in append order
    async fn list(&self) -> Result<Vec<SubmissionRecord>>;

    async fn len(&self) -> Result<usize>;
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct VecSubmissionLog {
        records: Mutex<Vec<SubmissionRecord>>,
    }

    impl VecSubmissionLog {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl SubmissionLog for VecSubmissionLog {
        async fn append(&self, record: SubmissionRecord) -> Result<()> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<SubmissionRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.records.lock().unwrap().len())
        }
    }
}

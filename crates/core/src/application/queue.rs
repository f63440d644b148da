// Job Queue - bounded admission channel in front of the worker pool

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::worker::constants::{DEFAULT_ADMISSION_TIMEOUT, DEFAULT_QUEUE_CAPACITY};
use crate::domain::JobDescriptor;
use crate::error::{AppError, Result};

/// Receiving end shared by every worker in the pool
pub type JobReceiver = Arc<Mutex<mpsc::Receiver<JobDescriptor>>>;

/// Queue configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Jobs buffered ahead of the workers
    pub capacity: usize,
    /// Longest time `enqueue` waits for room before failing with QueueFull
    pub admission_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            admission_timeout: DEFAULT_ADMISSION_TIMEOUT,
        }
    }
}

/// Sending end of the job queue, cheap to clone into request handlers
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<JobDescriptor>,
    admission_timeout: Duration,
}

/// Create a queue and the receiver the worker pool consumes
pub fn job_queue(config: QueueConfig) -> (JobQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel(config.capacity.max(1));
    (
        JobQueue {
            tx,
            admission_timeout: config.admission_timeout,
        },
        Arc::new(Mutex::new(rx)),
    )
}

impl JobQueue {
    /// Admit a job for asynchronous execution.
    ///
    /// Returns as soon as the job is buffered; never waits for it to run.
    /// A full buffer is waited on for at most the admission timeout.
    ///
    /// # Errors
    /// - AppError::QueueFull if the buffer stayed full (retryable)
    /// - AppError::ShuttingDown if the worker pool has stopped
    pub async fn enqueue(&self, job: JobDescriptor) -> Result<()> {
        let job_id = job.id.clone();
        match self.tx.send_timeout(job, self.admission_timeout).await {
            Ok(()) => {
                debug!(job_id = %job_id, depth = self.depth(), "Job admitted");
                Ok(())
            }
            Err(SendTimeoutError::Timeout(_)) => {
                warn!(
                    job_id = %job_id,
                    capacity = self.tx.max_capacity(),
                    "Queue full, rejecting job"
                );
                Err(AppError::QueueFull(format!(
                    "no room for job {} after {}ms",
                    job_id,
                    self.admission_timeout.as_millis()
                )))
            }
            Err(SendTimeoutError::Closed(_)) => Err(AppError::ShuttingDown(format!(
                "worker pool stopped, job {} not admitted",
                job_id
            ))),
        }
    }

    /// Jobs buffered and not yet picked up by a worker
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobId;

    fn job(id: &str) -> JobDescriptor {
        JobDescriptor::new(JobId::new(id), "maze", 0)
    }

    #[tokio::test]
    async fn test_enqueue_returns_without_a_consumer() {
        let (queue, rx) = job_queue(QueueConfig::default());
        queue.enqueue(job("1")).await.unwrap();
        assert_eq!(queue.depth(), 1);

        let received = rx.lock().await.recv().await.unwrap();
        assert_eq!(received.id.as_str(), "1");
        assert_eq!(queue.depth(), 0);
    }

    #[tokio::test]
    async fn test_full_buffer_reports_queue_full() {
        let (queue, _rx) = job_queue(QueueConfig {
            capacity: 1,
            admission_timeout: Duration::from_millis(20),
        });
        queue.enqueue(job("1")).await.unwrap();

        let err = queue.enqueue(job("2")).await.unwrap_err();
        assert!(matches!(err, AppError::QueueFull(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_full_buffer_admits_once_room_frees_up() {
        let (queue, rx) = job_queue(QueueConfig {
            capacity: 1,
            admission_timeout: Duration::from_secs(2),
        });
        queue.enqueue(job("1")).await.unwrap();

        let consumer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let received = rx.lock().await.recv().await;
            received
        });

        queue.enqueue(job("2")).await.unwrap();
        assert_eq!(consumer.await.unwrap().unwrap().id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_closed_receiver_reports_shutting_down() {
        let (queue, rx) = job_queue(QueueConfig::default());
        rx.lock().await.close();

        let err = queue.enqueue(job("1")).await.unwrap_err();
        assert!(matches!(err, AppError::ShuttingDown(_)));
        assert!(queue.is_closed());
    }
}

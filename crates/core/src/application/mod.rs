// Application Layer - Job queue, worker pool and submission use case

pub mod queue;
pub mod submission;
pub mod worker;

// Re-exports
pub use queue::{job_queue, JobQueue, JobReceiver, QueueConfig};
pub use submission::SubmissionService;
pub use worker::{shutdown_channel, PoolMonitor, ShutdownSender, ShutdownToken, WorkerConfig, WorkerPool};

// Submit Use Case

use crate::application::queue::JobQueue;
use crate::domain::{GeneratorRegistry, JobDescriptor, SubmissionRecord};
use crate::error::Result;
use crate::port::{IdProvider, SubmissionLog, TimeProvider};
use tracing::info;

/// Execute submit use case
///
/// Unknown generators are rejected before anything is queued. The submission
/// is logged only after the queue admitted it, so the log never lists a job
/// that cannot complete.
///
/// # Arguments
///
/// * `queue` - Job queue (admission may apply backpressure)
/// * `registry` - Known generator names
/// * `log` - Submission log
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `generator` - Requested generator name
pub async fn execute(
    queue: &JobQueue,
    registry: &GeneratorRegistry,
    log: &dyn SubmissionLog,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    generator: &str,
) -> Result<JobDescriptor> {
    registry.ensure_known(generator)?;

    let job = JobDescriptor::new(
        id_provider.generate_id(),
        generator,
        time_provider.now_millis(),
    );

    queue.enqueue(job.clone()).await?;
    log.append(SubmissionRecord::from(&job)).await?;

    info!(job_id = %job.id, generator = %job.generator, "Job submitted");
    Ok(job)
}

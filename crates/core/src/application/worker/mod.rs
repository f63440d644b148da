// Worker Pool - fixed number of workers draining the job queue

pub mod constants;
mod panic_guard;
mod shutdown;

use constants::*;
pub use panic_guard::{join_error_to_produce_error, panic_message};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::queue::JobReceiver;
use crate::domain::{ArtifactHandle, JobDescriptor, JobOutcome};
use crate::port::{ArtifactProducer, DelayProvider, ProduceError, ResultStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// Worker pool configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of workers, i.e. maximum concurrent renders
    pub workers: usize,
    /// Producer call timeout (`None` waits forever)
    pub render_timeout: Option<Duration>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKER_COUNT,
            render_timeout: Some(DEFAULT_RENDER_TIMEOUT),
        }
    }
}

/// Read-only view of the pool for health reporting
#[derive(Clone)]
pub struct PoolMonitor {
    size: usize,
    busy: Arc<AtomicUsize>,
}

impl PoolMonitor {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers currently executing a job (delay included)
    pub fn busy(&self) -> usize {
        self.busy.load(Ordering::SeqCst)
    }
}

/// Worker executes jobs one at a time
pub struct Worker {
    index: usize,
    producer: Arc<dyn ArtifactProducer>,
    results: Arc<dyn ResultStore>,
    delay: Arc<dyn DelayProvider>,
    render_timeout: Option<Duration>,
    busy: Arc<AtomicUsize>,
}

impl Worker {
    /// Run worker loop with graceful shutdown support
    ///
    /// A job already taken off the queue always runs to completion; shutdown
    /// only cuts its simulated delay short.
    pub async fn run(&self, receiver: JobReceiver, mut shutdown: ShutdownToken) {
        debug!(worker = self.index, "Worker started");
        loop {
            if shutdown.is_shutdown() {
                break;
            }
            let next = tokio::select! {
                biased;
                _ = shutdown.wait() => None,
                job = async { receiver.lock().await.recv().await } => job,
            };
            match next {
                Some(job) => {
                    self.busy.fetch_add(1, Ordering::SeqCst);
                    self.execute(job, &mut shutdown).await;
                    self.busy.fetch_sub(1, Ordering::SeqCst);
                }
                // Shutdown signalled or queue closed and drained
                None => break,
            }
        }
        debug!(worker = self.index, "Worker stopped");
    }

    /// Delay, render, store. Every failure ends up as a stored outcome.
    pub async fn execute(&self, job: JobDescriptor, shutdown: &mut ShutdownToken) {
        let started = Instant::now();

        let delay = self.delay.next_delay();
        debug!(
            worker = self.index,
            job_id = %job.id,
            delay_ms = delay.as_millis() as u64,
            "Simulating render latency"
        );
        tokio::select! {
            _ = sleep(delay) => {}
            _ = shutdown.wait() => {
                debug!(worker = self.index, job_id = %job.id, "Delay cut short by shutdown");
            }
        }

        let outcome = match self.render(&job.generator).await {
            Ok(handle) => {
                info!(
                    job_id = %job.id,
                    generator = %job.generator,
                    handle = %handle,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Stored artifact"
                );
                JobOutcome::Ready(handle)
            }
            Err(e) => {
                warn!(
                    job_id = %job.id,
                    generator = %job.generator,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Job failed"
                );
                JobOutcome::Failed(e.to_string())
            }
        };

        if let Err(e) = self.results.put(&job.id, outcome).await {
            error!(job_id = %job.id, error = %e, "Failed to store job outcome");
        }
    }

    /// Run the producer on the blocking pool, bounded by the render timeout
    async fn render(&self, generator: &str) -> Result<ArtifactHandle, ProduceError> {
        let producer = Arc::clone(&self.producer);
        let generator = generator.to_string();
        let task = tokio::task::spawn_blocking(move || producer.produce(&generator));

        let joined = match self.render_timeout {
            Some(limit) => match timeout(limit, task).await {
                Ok(joined) => joined,
                // The blocking thread keeps running; its result is discarded
                Err(_) => return Err(ProduceError::Timeout(limit.as_millis() as u64)),
            },
            None => task.await,
        };

        joined.unwrap_or_else(|e| Err(join_error_to_produce_error(e)))
    }
}

/// Fixed-size pool of workers sharing one queue receiver
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: ShutdownSender,
    receiver: JobReceiver,
    monitor: PoolMonitor,
}

impl WorkerPool {
    /// Spawn `config.workers` workers on the current runtime
    pub fn start(
        config: WorkerConfig,
        receiver: JobReceiver,
        producer: Arc<dyn ArtifactProducer>,
        results: Arc<dyn ResultStore>,
        delay: Arc<dyn DelayProvider>,
    ) -> Self {
        let size = config.workers.max(1);
        let (shutdown, token) = shutdown_channel();
        let busy = Arc::new(AtomicUsize::new(0));

        let handles = (0..size)
            .map(|index| {
                let worker = Worker {
                    index,
                    producer: Arc::clone(&producer),
                    results: Arc::clone(&results),
                    delay: Arc::clone(&delay),
                    render_timeout: config.render_timeout,
                    busy: Arc::clone(&busy),
                };
                let receiver = Arc::clone(&receiver);
                let token = token.clone();
                tokio::spawn(async move { worker.run(receiver, token).await })
            })
            .collect();

        info!(workers = size, render_timeout = ?config.render_timeout, "Worker pool started");

        Self {
            handles,
            shutdown,
            receiver,
            monitor: PoolMonitor { size, busy },
        }
    }

    pub fn monitor(&self) -> PoolMonitor {
        self.monitor.clone()
    }

    /// Stop accepting jobs, let in-flight jobs finish, then stop the workers.
    ///
    /// Workers still running after `grace` are aborted. Returns the number of
    /// jobs left without an outcome: buffered jobs that never started plus
    /// jobs aborted mid-render.
    pub async fn shutdown(self, grace: Duration) -> usize {
        info!(busy = self.monitor.busy(), "Shutting down worker pool");
        self.shutdown.shutdown();
        // No admissions from here on; buffered jobs stay readable for the drain
        self.receiver.lock().await.close();

        let deadline = Instant::now() + grace;
        let mut aborted = 0;
        for handle in self.handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let abort = handle.abort_handle();
            match timeout(remaining, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Worker task ended abnormally"),
                Err(_) => {
                    warn!("Worker did not finish within grace period, aborting");
                    abort.abort();
                    // Idle workers exit on the signal, so this one held a job
                    aborted += 1;
                }
            }
        }

        let mut rx = self.receiver.lock().await;
        let mut unstarted = 0;
        while rx.try_recv().is_ok() {
            unstarted += 1;
        }
        if unstarted > 0 || aborted > 0 {
            warn!(unstarted, aborted, "Dropped jobs without an outcome");
        }
        info!("Worker pool stopped");
        unstarted + aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queue::{job_queue, QueueConfig};
    use crate::domain::{JobId, JobStatus};
    use crate::port::artifact_producer::mocks::{MockBehavior, StubProducer};
    use crate::port::delay_provider::{FixedDelay, NoDelay};
    use crate::port::lookup;
    use crate::port::result_store::mocks::InMemoryResultStore;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "genart-core-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    async fn wait_until_settled(store: &InMemoryResultStore, expected: usize) {
        for _ in 0..500 {
            if store.len().await.unwrap() >= expected {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("jobs did not finish in time");
    }

    #[tokio::test]
    async fn test_every_admitted_job_gets_an_outcome() {
        let dir = scratch_dir("outcome");
        let producer = Arc::new(StubProducer::new(&dir, &["maze"]));
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 4, render_timeout: None },
            rx,
            producer.clone(),
            store.clone(),
            Arc::new(NoDelay),
        );

        for i in 0..20 {
            queue
                .enqueue(JobDescriptor::new(JobId::new(i.to_string()), "maze", 0))
                .await
                .unwrap();
        }
        wait_until_settled(&store, 20).await;

        for i in 0..20 {
            match lookup(store.as_ref(), &JobId::new(i.to_string())).await.unwrap() {
                JobStatus::Ready(handle) => assert!(!handle.is_empty()),
                other => panic!("job {} not ready: {:?}", i, other),
            }
        }
        assert_eq!(producer.call_count(), 20);
        assert_eq!(pool.shutdown(Duration::from_secs(1)).await, 0);
    }

    #[tokio::test]
    async fn test_pool_never_exceeds_worker_count() {
        let dir = scratch_dir("gate");
        let producer = Arc::new(
            StubProducer::new(&dir, &["maze"]).with_work(Duration::from_millis(20)),
        );
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 3, render_timeout: None },
            rx,
            producer.clone(),
            store.clone(),
            Arc::new(NoDelay),
        );

        for i in 0..15 {
            queue
                .enqueue(JobDescriptor::new(JobId::new(i.to_string()), "maze", 0))
                .await
                .unwrap();
        }
        wait_until_settled(&store, 15).await;

        assert!(producer.max_in_flight() <= 3, "ran {} at once", producer.max_in_flight());
        assert!(producer.max_in_flight() >= 2, "workers never overlapped");
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_producer_failure_is_stored_as_failed() {
        let dir = scratch_dir("fail");
        let producer = Arc::new(
            StubProducer::new(&dir, &["maze"]).with_behavior(MockBehavior::Fail("disk full".into())),
        );
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 1, render_timeout: None },
            rx,
            producer,
            store.clone(),
            Arc::new(NoDelay),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("f1"), "maze", 0))
            .await
            .unwrap();
        wait_until_settled(&store, 1).await;

        match lookup(store.as_ref(), &JobId::new("f1")).await.unwrap() {
            JobStatus::Failed(reason) => assert!(reason.contains("disk full")),
            other => panic!("expected failed, got {:?}", other),
        }
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_panicking_producer_fails_job_and_worker_survives() {
        let dir = scratch_dir("panic");
        let producer = Arc::new(
            StubProducer::new(&dir, &["maze"]).with_behavior(MockBehavior::Panic("boom".into())),
        );
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 1, render_timeout: None },
            rx,
            producer.clone(),
            store.clone(),
            Arc::new(NoDelay),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("p1"), "maze", 0))
            .await
            .unwrap();
        wait_until_settled(&store, 1).await;

        producer.set_behavior(MockBehavior::Success);
        queue
            .enqueue(JobDescriptor::new(JobId::new("p2"), "maze", 0))
            .await
            .unwrap();
        wait_until_settled(&store, 2).await;

        assert_eq!(
            lookup(store.as_ref(), &JobId::new("p1")).await.unwrap().as_str(),
            "failed"
        );
        assert_eq!(
            lookup(store.as_ref(), &JobId::new("p2")).await.unwrap().as_str(),
            "ready"
        );
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_render_timeout_fails_job() {
        let dir = scratch_dir("timeout");
        let producer = Arc::new(
            StubProducer::new(&dir, &["maze"]).with_work(Duration::from_millis(300)),
        );
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig {
                workers: 1,
                render_timeout: Some(Duration::from_millis(20)),
            },
            rx,
            producer,
            store.clone(),
            Arc::new(NoDelay),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("t1"), "maze", 0))
            .await
            .unwrap();
        wait_until_settled(&store, 1).await;

        match lookup(store.as_ref(), &JobId::new("t1")).await.unwrap() {
            JobStatus::Failed(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected failed, got {:?}", other),
        }
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_job_stays_pending_during_delay() {
        let dir = scratch_dir("pending");
        let producer = Arc::new(StubProducer::new(&dir, &["maze"]));
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 1, render_timeout: None },
            rx,
            producer,
            store.clone(),
            Arc::new(FixedDelay(Duration::from_millis(200))),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("d1"), "maze", 0))
            .await
            .unwrap();
        sleep(Duration::from_millis(20)).await;

        assert!(lookup(store.as_ref(), &JobId::new("d1")).await.unwrap().is_pending());
        assert_eq!(pool.monitor().busy(), 1);

        wait_until_settled(&store, 1).await;
        assert_eq!(
            lookup(store.as_ref(), &JobId::new("d1")).await.unwrap().as_str(),
            "ready"
        );
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_shutdown_finishes_in_flight_and_rejects_new_jobs() {
        let dir = scratch_dir("shutdown");
        let producer = Arc::new(StubProducer::new(&dir, &["maze"]));
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 1, render_timeout: None },
            rx,
            producer,
            store.clone(),
            Arc::new(FixedDelay(Duration::from_millis(100))),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("s1"), "maze", 0))
            .await
            .unwrap();
        sleep(Duration::from_millis(20)).await;
        queue
            .enqueue(JobDescriptor::new(JobId::new("s2"), "maze", 0))
            .await
            .unwrap();

        let dropped = pool.shutdown(Duration::from_secs(2)).await;

        assert_eq!(dropped, 1, "the buffered job never starts");
        assert_eq!(
            lookup(store.as_ref(), &JobId::new("s1")).await.unwrap().as_str(),
            "ready"
        );
        assert!(lookup(store.as_ref(), &JobId::new("s2")).await.unwrap().is_pending());
        assert!(queue
            .enqueue(JobDescriptor::new(JobId::new("s3"), "maze", 0))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_shutdown_cuts_delay_longer_than_grace() {
        let dir = scratch_dir("long-delay");
        let producer = Arc::new(StubProducer::new(&dir, &["maze"]));
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 1, render_timeout: None },
            rx,
            producer.clone(),
            store.clone(),
            Arc::new(FixedDelay(Duration::from_secs(30))),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("in-flight"), "maze", 0))
            .await
            .unwrap();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(pool.monitor().busy(), 1);

        let started = Instant::now();
        let dropped = pool.shutdown(Duration::from_millis(500)).await;

        assert_eq!(dropped, 0);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(producer.call_count(), 1);
        assert_eq!(
            lookup(store.as_ref(), &JobId::new("in-flight")).await.unwrap().as_str(),
            "ready"
        );
    }

    #[tokio::test]
    async fn test_render_aborted_after_grace_is_counted() {
        let dir = scratch_dir("abort");
        let producer = Arc::new(
            StubProducer::new(&dir, &["maze"]).with_work(Duration::from_millis(400)),
        );
        let store = Arc::new(InMemoryResultStore::new());
        let (queue, rx) = job_queue(QueueConfig::default());
        let pool = WorkerPool::start(
            WorkerConfig { workers: 2, render_timeout: None },
            rx,
            producer,
            store.clone(),
            Arc::new(NoDelay),
        );

        queue
            .enqueue(JobDescriptor::new(JobId::new("slow"), "maze", 0))
            .await
            .unwrap();
        sleep(Duration::from_millis(50)).await;

        let dropped = pool.shutdown(Duration::from_millis(50)).await;

        assert_eq!(dropped, 1, "the aborted render is reported");
        assert!(lookup(store.as_ref(), &JobId::new("slow")).await.unwrap().is_pending());
    }
}

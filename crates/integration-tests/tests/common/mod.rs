//! Shared harness: the production router wired to in-memory adapters.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use genart_api_http::{build_router, ApiConfig, AppState, Placeholder, RateLimiter};
use genart_core::application::{
    job_queue, JobReceiver, QueueConfig, SubmissionService, WorkerConfig, WorkerPool,
};
use genart_core::domain::GeneratorRegistry;
use genart_core::port::artifact_producer::mocks::StubProducer;
use genart_core::port::delay_provider::FixedDelay;
use genart_core::port::id_provider::UuidProvider;
use genart_core::port::time_provider::SystemTimeProvider;
use genart_core::port::{ArtifactProducer, ResultStore};
use genart_infra_memory::{MemoryResultStore, MemorySubmissionLog};

pub const GENERATORS: &[&str] = &[
    "maze",
    "julia",
    "randcicle",
    "blackhole",
    "janus",
    "random",
    "silksky",
    "circles",
];

pub const PLACEHOLDER_BYTES: &[u8] = b"\xFF\xD8\xFFloading-placeholder";

pub struct TestOptions {
    pub workers: usize,
    pub delay: Duration,
    pub capacity: usize,
    pub admission_timeout: Duration,
    pub render_timeout: Option<Duration>,
    pub burst: u32,
    /// Start the worker pool; when false nothing drains the queue
    pub start_pool: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            delay: Duration::ZERO,
            capacity: 64,
            admission_timeout: Duration::from_millis(50),
            render_timeout: Some(Duration::from_secs(5)),
            burst: 1_000,
            start_pool: true,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub service: Arc<SubmissionService>,
    pub pool: Option<WorkerPool>,
    pub dir: TempDir,
    receiver: Option<JobReceiver>,
}

/// Stub producer for every known generator name, writing into `dir`
pub fn stub_producer(dir: &Path) -> StubProducer {
    StubProducer::new(dir, GENERATORS)
}

/// Wire the production router exactly as the daemon does
pub fn assemble(producer: Arc<dyn ArtifactProducer>, dir: TempDir, options: TestOptions) -> TestApp {
    let registry = Arc::new(GeneratorRegistry::new(producer.generators()));
    let results: Arc<dyn ResultStore> = Arc::new(MemoryResultStore::new());
    let (queue, receiver) = job_queue(QueueConfig {
        capacity: options.capacity,
        admission_timeout: options.admission_timeout,
    });

    let (pool, receiver) = if options.start_pool {
        let pool = WorkerPool::start(
            WorkerConfig {
                workers: options.workers,
                render_timeout: options.render_timeout,
            },
            receiver,
            Arc::clone(&producer),
            Arc::clone(&results),
            Arc::new(FixedDelay(options.delay)),
        );
        (Some(pool), None)
    } else {
        (None, Some(receiver))
    };

    let service = Arc::new(SubmissionService::new(
        queue,
        registry,
        results,
        Arc::new(MemorySubmissionLog::new()),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    ));

    let router = build_router(AppState {
        service: Arc::clone(&service),
        producer,
        placeholder: Arc::new(Placeholder::new(PLACEHOLDER_BYTES, "image/jpeg")),
        pool: pool.as_ref().map(WorkerPool::monitor),
        rate_limiter: Arc::new(RateLimiter::new(options.burst, 0)),
        config: Arc::new(ApiConfig::default()),
    });

    TestApp {
        router,
        service,
        pool,
        dir,
        receiver,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response {
        get(self.router.clone(), uri).await
    }

    /// Poll /new/status until the job leaves `pending`
    pub async fn wait_finished(&self, id: &str, limit: Duration) -> serde_json::Value {
        let started = Instant::now();
        loop {
            let response = self.get(&format!("/new/status/{}", id)).await;
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            if json["state"] != "pending" {
                return json;
            }
            assert!(
                started.elapsed() < limit,
                "job {} still pending after {:?}",
                id,
                limit
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Submit and return the job id
    pub async fn submit(&self, generator: &str) -> String {
        let response = self.get(&format!("/new/{}", generator)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        json["id"].as_str().unwrap().to_string()
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

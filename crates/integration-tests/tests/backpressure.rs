//! Admission control: full queue, rate limiting, shutdown, bounded pool

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use common::{assemble, body_json, stub_producer, TestOptions};

/// With nothing draining the queue, the submission past capacity is
/// rejected as retryable and is not logged.
#[tokio::test]
async fn test_queue_full_returns_503_with_retry_after() {
    let dir = tempfile::tempdir().unwrap();
    let app = assemble(
        Arc::new(stub_producer(dir.path())),
        dir,
        TestOptions {
            capacity: 1,
            admission_timeout: Duration::from_millis(20),
            start_pool: false,
            ..Default::default()
        },
    );

    let accepted = app.get("/new/maze").await;
    assert_eq!(accepted.status(), StatusCode::OK);

    let rejected = app.get("/new/maze").await;
    assert_eq!(rejected.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(common::header(&rejected, "retry-after"), Some("1"));
    assert_eq!(body_json(rejected).await["code"], "QUEUE_FULL");

    let table = body_json(app.get("/generated-images-table").await).await;
    assert_eq!(table["jobs"].as_array().unwrap().len(), 1);

    let health = body_json(app.get("/health").await).await;
    assert_eq!(health["queue_depth"], 1);
    assert_eq!(health["workers"], 0);
}

/// A submission turned away by a full queue keeps its rate-limit token,
/// so the client's retry sees the queue state rather than THROTTLED.
#[tokio::test]
async fn test_queue_full_does_not_spend_rate_limit_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = assemble(
        Arc::new(stub_producer(dir.path())),
        dir,
        TestOptions {
            capacity: 1,
            admission_timeout: Duration::from_millis(20),
            burst: 2,
            start_pool: false,
            ..Default::default()
        },
    );

    assert_eq!(app.get("/new/maze").await.status(), StatusCode::OK);

    for _ in 0..3 {
        let rejected = app.get("/new/maze").await;
        assert_eq!(rejected.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(rejected).await["code"], "QUEUE_FULL");
    }
}

/// The token bucket caps submissions but not reads
#[tokio::test]
async fn test_rate_limited_submissions() {
    let dir = tempfile::tempdir().unwrap();
    let app = assemble(
        Arc::new(stub_producer(dir.path())),
        dir,
        TestOptions {
            burst: 2,
            ..Default::default()
        },
    );

    assert_eq!(app.get("/new/julia").await.status(), StatusCode::OK);
    assert_eq!(app.get("/new/julia").await.status(), StatusCode::OK);

    let throttled = app.get("/new/julia").await;
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(throttled).await["code"], "THROTTLED");

    assert_eq!(app.get("/list/simple").await.status(), StatusCode::OK);
    assert_eq!(app.get("/image/julia").await.status(), StatusCode::OK);
}

/// Once the pool has stopped, submissions fail with SHUTTING_DOWN
#[tokio::test]
async fn test_submission_after_shutdown_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = assemble(
        Arc::new(stub_producer(dir.path())),
        dir,
        TestOptions {
            workers: 2,
            ..Default::default()
        },
    );

    let id = app.submit("random").await;
    app.wait_finished(&id, Duration::from_secs(5)).await;

    let pool = app.pool.take().unwrap();
    let dropped = pool.shutdown(Duration::from_secs(1)).await;
    assert_eq!(dropped, 0);

    let response = app.get("/new/random").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SHUTTING_DOWN");

    // Finished work stays readable
    let status = body_json(app.get(&format!("/new/status/{}", id)).await).await;
    assert_eq!(status["state"], "ready");
}

/// A burst larger than the pool never runs more renders than workers
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_render_concurrency_bounded_by_pool_size() {
    const WORKERS: usize = 3;
    const JOBS: usize = 20;

    let dir = tempfile::tempdir().unwrap();
    let producer = Arc::new(stub_producer(dir.path()).with_work(Duration::from_millis(30)));
    let app = assemble(
        producer.clone(),
        dir,
        TestOptions {
            workers: WORKERS,
            capacity: JOBS,
            ..Default::default()
        },
    );

    let mut ids = Vec::with_capacity(JOBS);
    for _ in 0..JOBS {
        ids.push(app.submit("circles").await);
    }
    for id in &ids {
        let status = app.wait_finished(id, Duration::from_secs(10)).await;
        assert_eq!(status["state"], "ready");
    }

    assert_eq!(producer.call_count(), JOBS);
    assert!(producer.max_in_flight() <= WORKERS);
    assert!(producer.max_in_flight() >= 2, "renders never overlapped");
}

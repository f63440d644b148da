//! Genart Job Service - Main Entry Point
//! HTTP server + worker pool rendering generative images asynchronously

mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

// Import workspace crates
use genart_api_http::{build_router, ApiConfig, AppState, Placeholder, RateLimiter};
use genart_core::application::{
    job_queue, QueueConfig, SubmissionService, WorkerConfig, WorkerPool,
};
use genart_core::domain::{ArtifactHandle, GeneratorRegistry};
use genart_core::port::delay_provider::RandomDelay;
use genart_core::port::id_provider::UuidProvider;
use genart_core::port::time_provider::SystemTimeProvider;
use genart_core::port::{ArtifactProducer, ResultStore};
use genart_infra_memory::{MemoryResultStore, MemorySubmissionLog};
use genart_infra_render::{
    render_loading_placeholder, CanvasConfig, PngArtifactProducer, PLACEHOLDER_MEDIA_TYPE,
};

use crate::config::ServiceConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (.env first, then process environment)
    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    let _log_guard = telemetry::init_logging(&config.log)?;
    info!("Genart job service v{} starting...", VERSION);
    info!(
        addr = %config.bind_addr(),
        workers = config.workers,
        queue_capacity = config.queue_capacity,
        max_delay_ms = config.max_delay.as_millis() as u64,
        output_dir = %config.output_dir.display(),
        "Loaded configuration"
    );

    // 3. Setup dependencies (DI wiring)
    let canvas = CanvasConfig::default().with_size(config.canvas_width, config.canvas_height);
    let producer = Arc::new(
        PngArtifactProducer::new(&config.output_dir, canvas).with_context(|| {
            format!(
                "Failed to prepare output directory {}",
                config.output_dir.display()
            )
        })?,
    );
    let registry = Arc::new(GeneratorRegistry::new(producer.generators()));
    info!(generators = ?registry.names(), "Generators registered");

    let placeholder = load_placeholder(&config).await?;
    let results: Arc<dyn ResultStore> = Arc::new(MemoryResultStore::new());
    let submissions = Arc::new(MemorySubmissionLog::new());

    // 4. Start worker pool
    let (queue, receiver) = job_queue(QueueConfig {
        capacity: config.queue_capacity,
        admission_timeout: config.admission_timeout,
    });
    let pool = WorkerPool::start(
        WorkerConfig {
            workers: config.workers,
            render_timeout: config.render_timeout,
        },
        receiver,
        producer.clone(),
        results.clone(),
        Arc::new(RandomDelay::new(config.max_delay)),
    );

    let service = SubmissionService::new(
        queue,
        registry,
        results,
        submissions,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    );

    // 5. Start HTTP server
    let state = AppState {
        service: Arc::new(service),
        producer,
        placeholder: Arc::new(placeholder),
        pool: Some(pool.monitor()),
        rate_limiter: Arc::new(RateLimiter::new(
            config.rate_limit_burst,
            config.rate_limit_rate,
        )),
        config: Arc::new(ApiConfig {
            public_host: config.public_host.clone(),
            request_timeout: config.request_timeout,
        }),
    };
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(%addr, "System ready. Waiting for requests...");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // 6. Graceful shutdown: in-flight jobs finish, buffered and overdue ones are dropped
    info!("Server stopped accepting connections, draining worker pool");
    let dropped = pool.shutdown(config.shutdown_timeout).await;

    info!(dropped_jobs = dropped, "Shutdown complete.");
    Ok(())
}

/// Placeholder bytes from the configured file, or a generated image
async fn load_placeholder(config: &ServiceConfig) -> Result<Placeholder> {
    match &config.placeholder_path {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read placeholder {}", path.display()))?;
            let media_type = ArtifactHandle::new(path.clone()).media_type();
            info!(path = %path.display(), media_type, "Loaded placeholder image");
            Ok(Placeholder::new(bytes, media_type))
        }
        None => {
            let bytes = render_loading_placeholder(config.canvas_width, config.canvas_height)
                .context("Failed to render placeholder image")?;
            Ok(Placeholder::new(bytes, PLACEHOLDER_MEDIA_TYPE))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT (Ctrl-C), starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}

// Port Layer - Interfaces for external dependencies

pub mod artifact_producer;
pub mod delay_provider; // Injected so tests can run with zero latency
pub mod id_provider; // For deterministic testing
pub mod result_store;
pub mod submission_log;
pub mod time_provider;

// Re-exports
pub use artifact_producer::{ArtifactProducer, ProduceError};
pub use delay_provider::DelayProvider;
pub use id_provider::IdProvider;
pub use result_store::{lookup, ResultStore};
pub use submission_log::SubmissionLog;
pub use time_provider::TimeProvider;

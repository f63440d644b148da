// Domain Layer - Pure job model and generator registry

pub mod error;
pub mod job;
pub mod registry;

// Re-exports
pub use error::DomainError;
pub use job::{
    ArtifactHandle, GeneratorName, JobDescriptor, JobId, JobOutcome, JobStatus, SubmissionRecord,
};
pub use registry::GeneratorRegistry;

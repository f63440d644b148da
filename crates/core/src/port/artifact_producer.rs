// Artifact Producer Port
// Abstraction over the drawing library: generator name in, image file out

use crate::domain::{ArtifactHandle, GeneratorName};
use thiserror::Error;

/// Producer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProduceError {
    #[error("Unknown generator: {0}")]
    UnknownGenerator(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Render timed out after {0}ms")]
    Timeout(u64),

    #[error("Render panicked: {0}")]
    Panicked(String),
}

impl From<std::io::Error> for ProduceError {
    fn from(e: std::io::Error) -> Self {
        ProduceError::Io(e.to_string())
    }
}

/// Artifact Producer trait
///
/// `produce` is synchronous and may be slow; callers on the async runtime run
/// it through `tokio::task::spawn_blocking`.
///
/// Implementations:
/// - PngArtifactProducer: renders procedural drawings to PNG files
/// - StubProducer: writes a fixed payload (tests)
pub trait ArtifactProducer: Send + Sync {
    /// Generator names this producer knows how to render
    fn generators(&self) -> Vec<GeneratorName>;

    /// Render one artifact for `generator` and return where it was written
    ///
    /// # Errors
    /// - ProduceError::UnknownGenerator if the name is not registered
    /// - ProduceError::Io / Encode if the file cannot be written
    fn produce(&self, generator: &str) -> Result<ArtifactHandle, ProduceError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Payload written by the stub for every successful render
    pub const STUB_ARTIFACT_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nstub-artifact";

    /// Mock producer behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Write the stub payload
        Success,
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Stub producer that writes a tiny file per call and records concurrency
    pub struct StubProducer {
        dir: PathBuf,
        names: Vec<GeneratorName>,
        behavior: Mutex<MockBehavior>,
        work: Duration,
        call_count: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubProducer {
        pub fn new(dir: impl Into<PathBuf>, names: &[&str]) -> Self {
            Self {
                dir: dir.into(),
                names: names.iter().map(|n| n.to_string()).collect(),
                behavior: Mutex::new(MockBehavior::Success),
                work: Duration::ZERO,
                call_count: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        /// Hold each render for `work` so concurrent calls overlap
        pub fn with_work(mut self, work: Duration) -> Self {
            self.work = work;
            self
        }

        pub fn with_behavior(self, behavior: MockBehavior) -> Self {
            self.set_behavior(behavior);
            self
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Highest number of renders observed running at the same time
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    impl ArtifactProducer for StubProducer {
        fn generators(&self) -> Vec<GeneratorName> {
            self.names.clone()
        }

        fn produce(&self, generator: &str) -> Result<ArtifactHandle, ProduceError> {
            let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if !self.work.is_zero() {
                std::thread::sleep(self.work);
            }

            let behavior = self.behavior.lock().unwrap().clone();
            let result = match behavior {
                MockBehavior::Success if self.names.iter().any(|g| g == generator) => {
                    let path = self.dir.join(format!("{}_{}.png", generator, n));
                    std::fs::write(&path, STUB_ARTIFACT_BYTES)
                        .map(|_| ArtifactHandle::new(path))
                        .map_err(ProduceError::from)
                }
                MockBehavior::Success => Err(ProduceError::UnknownGenerator(generator.to_string())),
                MockBehavior::Fail(msg) => Err(ProduceError::Io(msg)),
                MockBehavior::Panic(msg) => {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }
}

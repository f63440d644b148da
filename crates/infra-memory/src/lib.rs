// Genart Infrastructure - In-Memory Adapters
// Implements: ResultStore, SubmissionLog
//
// State lives for the process lifetime only; nothing is evicted.

mod result_store;
mod submission_log;

pub use result_store::MemoryResultStore;
pub use submission_log::MemorySubmissionLog;

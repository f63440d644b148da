//! Genart SDK - Rust Client Library
//!
//! Provides a convenient client for the Genart job service.
//!
//! # Example
//!
//! ```no_run
//! use genart_sdk::{GenartClient, LoadOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GenartClient::new("http://127.0.0.1:8080")?;
//!
//!     // Submit a job; the response comes back before the image exists
//!     let job = client.submit("julia").await?;
//!     println!("Job submitted: {} (poll {})", job.id, job.url);
//!
//!     match client.load(&job.id).await? {
//!         LoadOutcome::Pending(_) => println!("still rendering"),
//!         LoadOutcome::Ready(image) => println!("{} bytes", image.bytes.len()),
//!         LoadOutcome::Failed(reason) => println!("failed: {}", reason),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::GenartClient;
pub use error::{Result, SdkError};
pub use types::{
    GeneratorList, Health, Image, JobRow, JobState, JobStatus, JobsTable, LoadOutcome,
    SubmitResponse,
};

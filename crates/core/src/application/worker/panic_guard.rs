// Panic isolation for renders running on the blocking pool
use std::any::Any;
use tokio::task::JoinError;
use tracing::error;

use crate::port::ProduceError;

/// Best-effort text of a panic payload
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Convert a failed `spawn_blocking` join into a producer error
///
/// A panicking render must fail its own job, never the worker that awaited it.
pub fn join_error_to_produce_error(err: JoinError) -> ProduceError {
    if err.is_panic() {
        let msg = panic_message(err.into_panic());
        error!(panic_msg = %msg, "Render task panicked");
        ProduceError::Panicked(msg)
    } else {
        ProduceError::Panicked(format!("render task cancelled: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_handles_str_and_string() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42u8)), "Unknown panic");
    }

    #[tokio::test]
    async fn test_join_error_from_panic() {
        let err = tokio::task::spawn_blocking(|| -> u8 { panic!("kaboom") })
            .await
            .unwrap_err();
        assert_eq!(
            join_error_to_produce_error(err),
            ProduceError::Panicked("kaboom".to_string())
        );
    }
}

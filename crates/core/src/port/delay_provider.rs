// Delay Provider Port - simulated render latency

use rand::Rng;
use std::time::Duration;

/// Source of the per-job simulated delay
pub trait DelayProvider: Send + Sync {
    /// Delay to wait before rendering the next job
    fn next_delay(&self) -> Duration;
}

/// Uniform delay in `[0, max)` at millisecond granularity (production)
pub struct RandomDelay {
    max: Duration,
}

impl RandomDelay {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl DelayProvider for RandomDelay {
    fn next_delay(&self) -> Duration {
        let max_ms = self.max.as_millis().min(u64::MAX as u128) as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }
}

/// Always zero (tests, benchmarks)
pub struct NoDelay;

impl DelayProvider for NoDelay {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Constant delay (tests that need jobs to overlap)
pub struct FixedDelay(pub Duration);

impl DelayProvider for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_stays_in_range() {
        let provider = RandomDelay::new(Duration::from_millis(50));
        for _ in 0..1000 {
            assert!(provider.next_delay() < Duration::from_millis(50));
        }
    }

    #[test]
    fn test_zero_max_means_no_delay() {
        let provider = RandomDelay::new(Duration::ZERO);
        assert_eq!(provider.next_delay(), Duration::ZERO);
        assert_eq!(NoDelay.next_delay(), Duration::ZERO);
    }
}

//! Injectable pacing between generation calls.
//!
//! The orchestrator self-rate-limits against the model API by pausing
//! between items. The pause is behind a trait so tests run with zero delay
//! and production throughput can be tuned (or swapped for a token bucket)
//! without touching the orchestrator.

use std::future::Future;
use std::time::Duration;

pub trait RateLimiter: Send + Sync {
    /// Waits until the next call is allowed to proceed.
    fn acquire(&self) -> impl Future<Output = ()> + Send;
}

/// Fixed sleep between calls: the simplest limiter that respects the
/// model API's rate limit. Not adaptive to observed latency or error rate.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl RateLimiter for FixedDelay {
    fn acquire(&self) -> impl Future<Output = ()> + Send {
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

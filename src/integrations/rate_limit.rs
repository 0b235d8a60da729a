// src/integrations/rate_limit.rs
//
// Provider Rate Limiting
//
// Both upstream providers impose request quotas. Each client owns one
// limiter; because clients are shared via Arc across every movie's
// pipeline, the limiter gates all outbound calls process-wide no matter
// how many pipelines run.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval pacing for one provider.
///
/// The lock is held across the wait, so concurrent callers are
/// serialized and each departs at least `min_interval` after the
/// previous request.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            // Far enough in the past that the first call never waits
            last_request: Mutex::new(Instant::now() - Duration::from_secs(60)),
        }
    }

    /// Wait until the next request is allowed, then claim the slot.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

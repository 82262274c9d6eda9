//! Token bucket pacing for outbound sends.
//!
//! The bucket starts full. Each send takes one token and tokens refill
//! continuously at `rate_per_sec`, capped at `burst`. With the defaults
//! (10/s, burst 1) consecutive sends are spaced 100 ms apart.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, rate_per_sec: f64, burst: f64) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate_per_sec).min(burst);
        self.last_refill = now;
    }
}

/// An async token-bucket rate limiter.
///
/// Waiters queue on a tokio mutex, so tokens are handed out in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Option<Mutex<Bucket>>,
    rate_per_sec: f64,
    burst: f64,
}

impl RateLimiter {
    /// Create a limiter. A `rate_per_sec` of 0 disables limiting.
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        if rate_per_sec == 0 {
            return Self::unlimited();
        }

        let burst = f64::from(burst.max(1));
        Self {
            bucket: Some(Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            })),
            rate_per_sec: f64::from(rate_per_sec),
            burst,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self {
            bucket: None,
            rate_per_sec: 0.0,
            burst: 0.0,
        }
    }

    /// Wait until a token is available, then take it.
    pub async fn acquire(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        let mut bucket = bucket.lock().await;
        bucket.refill(self.rate_per_sec, self.burst);

        if bucket.tokens < 1.0 {
            let wait = Duration::from_secs_f64((1.0 - bucket.tokens) / self.rate_per_sec);
            tracing::trace!(wait_ms = wait.as_millis() as u64, "Rate limiter pacing send");
            tokio::time::sleep(wait).await;
            bucket.refill(self.rate_per_sec, self.burst);
        }

        bucket.tokens = (bucket.tokens - 1.0).max(0.0);
    }
}

impl Default for RateLimiter {
    /// Ten messages per second, no burst.
    fn default() -> Self {
        Self::new(10, 1)
    }
}

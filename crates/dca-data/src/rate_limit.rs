//! Request rate limiter.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Spaces calls a minimum interval apart.
///
/// The last-call instant lives inside the limiter, so separate instances
/// never interfere; tests and concurrent sources each get their own.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_allowed: Mutex<Instant>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum interval between calls.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: Mutex::new(Instant::now()),
        }
    }

    /// Wait until the next call is allowed, then claim the slot.
    ///
    /// Concurrent callers are serialized: each claims its own slot under the
    /// lock before sleeping, so two callers never share one.
    pub async fn acquire(&self) {
        let wait_until = {
            let mut next = self.next_allowed.lock().unwrap_or_else(|e| e.into_inner());
            let now = Instant::now();
            let slot = if *next > now { *next } else { now };
            *next = slot + self.min_interval;
            slot
        };
        sleep_until(wait_until).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_spacing_between_calls() {
        let limiter = RateLimiter::new(Duration::from_millis(200));

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        // First call is free, the next two each wait the full interval
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_instances() {
        let a = RateLimiter::new(Duration::from_secs(60));
        let b = RateLimiter::new(Duration::from_secs(60));

        let start = Instant::now();
        a.acquire().await;
        b.acquire().await;
        // Separate limiters do not serialize against each other
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Shared limiter over outbound calls: no more than `max_requests` may
/// start inside any `window`-sized span.
///
/// Clients hold a clone and call [`acquire`](Self::acquire) before every
/// outbound request; the limiter is constructed once and passed in, never
/// reached for as a global.
#[derive(Clone)]
pub struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window,
        }
    }

    /// Block until a request slot is available, then claim it.
    pub async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Evict calls that have aged out of the window.
            while ts
                .front()
                .is_some_and(|&front| now.duration_since(front) >= self.window)
            {
                ts.pop_front();
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Sleep until the oldest call ages out, with a little slack so
            // the retry does not race the eviction.
            let oldest = ts.front().copied().unwrap_or(now);
            let wait = self.window.saturating_sub(now.duration_since(oldest))
                + Duration::from_millis(50);
            drop(ts);
            tracing::debug!(wait_secs = wait.as_secs_f64(), "request window full, backing off");
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_burst_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn blocks_when_window_is_full() {
        let limiter = RateLimiter::new(2, Duration::from_millis(200));
        limiter.acquire().await;
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(150));
    }
}

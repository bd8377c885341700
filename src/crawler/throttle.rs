//! Politeness throttle for the target host
//!
//! This module enforces a minimum delay between the start of consecutive
//! fetches. The throttle is shared by every worker, so the request rate to the
//! host is bounded globally rather than per worker.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Global minimum-delay gate in front of every fetch
///
/// Cloning is cheap and clones share the same "last request" instant.
#[derive(Debug, Clone)]
pub struct Throttle {
    /// Minimum time between consecutive requests
    delay: Duration,

    /// Timestamp of the last request handed out
    last_request_time: Arc<Mutex<Option<Instant>>>,
}

impl Throttle {
    /// Creates a throttle with the given minimum delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits until a request may be made, then records it
    ///
    /// The lock is held while sleeping so concurrent callers queue up and
    /// each one is spaced `delay` after the previous.
    pub async fn wait_turn(&self) {
        let mut last = self.last_request_time.lock().await;

        if let Some(wait) = time_until_next_request(*last, self.delay, Instant::now()) {
            tracing::trace!("Throttling for {:?}", wait);
            tokio::time::sleep(wait).await;
        }

        *last = Some(Instant::now());
    }

    /// The configured minimum delay
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Calculates the time until the next request can be made
///
/// Returns None if a request can be made now, or the duration to wait otherwise.
pub fn time_until_next_request(
    last_request_time: Option<Instant>,
    delay: Duration,
    now: Instant,
) -> Option<Duration> {
    let last = last_request_time?;
    let elapsed = now.saturating_duration_since(last);
    if elapsed < delay {
        Some(delay - elapsed)
    } else {
        None
    }
}

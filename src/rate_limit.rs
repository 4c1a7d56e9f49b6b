//! Helpers for spacing out successive calls. The retry loop never uses these.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Suspends the calling task for `seconds`. Negative, NaN and infinite values wait zero.
pub async fn delay(seconds: f64) {
    tokio::time::sleep(duration_from_secs(seconds)).await;
}

pub(crate) fn duration_from_secs(seconds: f64) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// Hands out evenly spaced slots to any number of concurrent callers.
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn per_second(calls: f64) -> Self {
        let interval = if calls > 0.0 {
            duration_from_secs(1.0 / calls)
        } else {
            Duration::ZERO
        };
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the caller's reserved slot. The first call proceeds immediately.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot.checked_add(self.interval).unwrap_or(slot));
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

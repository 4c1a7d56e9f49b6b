use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::errors::Error;

/// How the inter-attempt delay grows with the number of attempts already made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    #[default]
    Constant,
    Linear,
    Quadratic,
}

/// Strategy for adding randomness to delay calculations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterStrategy {
    Full,
    Decorrelated,
}

/// Which non-2xx responses are worth another attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRetry {
    /// Every non-2xx status is treated as transient.
    #[default]
    AnyNon2xx,
    /// Only 5xx and 429 are retried; any other status ends the call at once.
    ServerErrorsAndThrottling,
}

impl StatusRetry {
    pub fn is_retryable(&self, status: u16) -> bool {
        match self {
            StatusRetry::AnyNon2xx => true,
            StatusRetry::ServerErrorsAndThrottling => status == 429 || (500..600).contains(&status),
        }
    }
}

/// Attempt budget, per-attempt timeout and inter-attempt delay for one fetcher.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Zero disables the per-attempt timeout.
    pub timeout: Duration,
    pub delay: Duration,
    pub backoff: Backoff,
    pub max_delay: Option<Duration>,
    pub jitter: Option<JitterStrategy>,
    pub status_retry: StatusRetry,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, timeout: Duration, delay: Duration) -> Result<Self, Error> {
        if max_attempts == 0 {
            return Err(Error::Config("max_attempts must be >= 1".into()));
        }
        Ok(Self {
            max_attempts,
            timeout,
            delay,
            backoff: Backoff::Constant,
            max_delay: None,
            jitter: None,
            status_retry: StatusRetry::AnyNon2xx,
        })
    }

    pub fn default_policy() -> Self {
        Self {
            max_attempts: 10,
            timeout: Duration::from_secs(30),
            delay: Duration::from_secs(1),
            backoff: Backoff::Constant,
            max_delay: None,
            jitter: None,
            status_retry: StatusRetry::AnyNon2xx,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn with_jitter(mut self, jitter: JitterStrategy) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn with_status_retry(mut self, status_retry: StatusRetry) -> Self {
        self.status_retry = status_retry;
        self
    }

    /// Per-attempt timeout, or `None` when disabled.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    /// Delay to wait after `attempts_made` failed attempts, before the next one.
    pub fn delay_after_attempt(&self, attempts_made: u32, rng: &mut impl Rng) -> Duration {
        let n = attempts_made.max(1);
        let mut delay = match self.backoff {
            Backoff::Constant => self.delay,
            Backoff::Linear => self.delay.saturating_mul(n),
            Backoff::Quadratic => self.delay.saturating_mul(n.saturating_mul(n)),
        };
        if let Some(cap) = self.max_delay {
            delay = delay.min(cap);
        }
        match self.jitter {
            Some(JitterStrategy::Full) => delay.mul_f64(rng.gen_range(0.0..1.0)),
            Some(JitterStrategy::Decorrelated) => delay.mul_f64(rng.gen_range(0.5..1.5)),
            None => delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::default_policy()
    }
}

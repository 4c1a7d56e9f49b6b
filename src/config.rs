//! Connector configuration, built in code or read from a JSON file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Error;
use crate::rate_limit::duration_from_secs;
use crate::retry::{Backoff, JitterStrategy, RetryPolicy, StatusRetry};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logfile: PathBuf,
    #[serde(default)]
    pub overwrite_log: bool,
    #[serde(default = "default_n_tries")]
    pub n_tries: u32,
    /// Per-attempt timeout in seconds; 0 disables it.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: f64,
    #[serde(default)]
    pub backoff: Backoff,
    #[serde(default)]
    pub max_retry_delay: Option<f64>,
    /// Randomises each inter-attempt delay; off by default.
    #[serde(default)]
    pub jitter: Option<JitterStrategy>,
    #[serde(default)]
    pub status_retry: StatusRetry,
}

fn default_n_tries() -> u32 {
    10
}

fn default_timeout() -> f64 {
    30.0
}

fn default_retry_delay() -> f64 {
    1.0
}

impl Config {
    pub fn new(logfile: impl Into<PathBuf>) -> Self {
        Self {
            logfile: logfile.into(),
            overwrite_log: false,
            n_tries: default_n_tries(),
            timeout: default_timeout(),
            retry_delay: default_retry_delay(),
            backoff: Backoff::default(),
            max_retry_delay: None,
            jitter: None,
            status_retry: StatusRetry::default(),
        }
    }

    /// Load configuration from a JSON file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overwrite(mut self, overwrite_log: bool) -> Self {
        self.overwrite_log = overwrite_log;
        self
    }

    pub fn with_n_tries(mut self, n_tries: u32) -> Self {
        self.n_tries = n_tries;
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_retry_delay(mut self, seconds: f64) -> Self {
        self.retry_delay = seconds;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_retry_delay(mut self, seconds: f64) -> Self {
        self.max_retry_delay = Some(seconds);
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

    pub fn validate(&self) -> Result<(), Error> {
        if self.n_tries == 0 {
            return Err(Error::Config("n_tries must be >= 1".into()));
        }
        check_seconds("timeout", self.timeout)?;
        check_seconds("retry_delay", self.retry_delay)?;
        if let Some(cap) = self.max_retry_delay {
            check_seconds("max_retry_delay", cap)?;
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, Error> {
        self.validate()?;
        let mut policy = RetryPolicy::new(
            self.n_tries,
            duration_from_secs(self.timeout),
            duration_from_secs(self.retry_delay),
        )?
        .with_backoff(self.backoff)
        .with_status_retry(self.status_retry);
        if let Some(cap) = self.max_retry_delay {
            policy = policy.with_max_delay(duration_from_secs(cap));
        }
        if let Some(jitter) = self.jitter {
            policy = policy.with_jitter(jitter);
        }
        Ok(policy)
    }
}

fn check_seconds(name: &str, value: f64) -> Result<(), Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!(
            "{name} must be a finite number of seconds >= 0, got {value}"
        )));
    }
    Ok(())
}

use std::time::Duration;

use jiff::Timestamp;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;
use crate::transport::AttemptFailure;

/// Structured events for one logical call. The `call` uuid ties together
/// events of calls interleaved on the same runtime.
#[derive(Clone, Debug)]
pub struct FetchTelemetry {
    call: Uuid,
    project: String,
    url: String,
}

impl FetchTelemetry {
    pub fn new(project: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            call: Uuid::new_v4(),
            project: project.into(),
            url: url.into(),
        }
    }

    pub fn call(&self) -> Uuid {
        self.call
    }

    pub fn emit_start(&self, at: Timestamp) {
        event!(
            Level::DEBUG,
            call = %self.call,
            project = %self.project,
            url = %self.url,
            timestamp = %at,
            "fetch.start"
        );
    }

    pub fn emit_attempt_failed(&self, attempt: u32, failure: &AttemptFailure) {
        event!(
            Level::DEBUG,
            call = %self.call,
            url = %self.url,
            attempt,
            error = %failure,
            "fetch.attempt_failed"
        );
    }

    pub fn emit_retry(
        &self,
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
        failure: &AttemptFailure,
    ) {
        event!(
            Level::WARN,
            call = %self.call,
            project = %self.project,
            url = %self.url,
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %failure,
            "fetch.retry"
        );
    }

    pub fn emit_success(&self, attempts: u32, status: u16, elapsed: Duration) {
        event!(
            Level::INFO,
            call = %self.call,
            project = %self.project,
            url = %self.url,
            attempts,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "fetch.success"
        );
    }

    pub fn emit_failure(&self, attempts: u32, error: &str, elapsed: Duration) {
        event!(
            Level::ERROR,
            call = %self.call,
            project = %self.project,
            url = %self.url,
            attempts,
            error,
            elapsed_ms = elapsed.as_millis() as u64,
            "fetch.failure"
        );
    }

    pub fn emit_log_failure(&self, error: &Error) {
        event!(
            Level::ERROR,
            call = %self.call,
            project = %self.project,
            url = %self.url,
            error = %error,
            "fetch.log_failed"
        );
    }
}

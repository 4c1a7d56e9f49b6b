use std::sync::Arc;

use jiff::Timestamp;
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::call_log::CallLogger;
use crate::errors::Error;
use crate::retry::{AttemptState, FetchOutcome, RetryPolicy, Verdict, classify_response};
use crate::telemetry::FetchTelemetry;
use crate::transport::{AttemptFailure, Transport};
use crate::types::{Fetched, ResponseBody, ResponseMeta};

/// Runs logical GETs under a [`RetryPolicy`] and records each one in a shared [`CallLogger`].
///
/// Every call that reaches a terminal state writes exactly one row. A call whose
/// future is dropped before that point (cancellation) writes nothing; once the
/// row write has begun it completes regardless.
pub struct Fetcher {
    policy: RetryPolicy,
    logger: Arc<CallLogger>,
    rng: Mutex<StdRng>,
}

impl Fetcher {
    pub fn new(policy: RetryPolicy, logger: Arc<CallLogger>) -> Self {
        Self {
            policy,
            logger,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn logger(&self) -> &Arc<CallLogger> {
        &self.logger
    }

    /// Fetches `url`, retrying retriable failures until the attempt budget is spent.
    ///
    /// Fails with [`Error::Exhausted`] carrying the last attempt's error once no
    /// attempts remain. A log write failure is reported through tracing and
    /// leaves the result untouched.
    pub async fn get<T>(&self, transport: &T, url: &str, project: &str) -> Result<Fetched, Error>
    where
        T: Transport + Sync,
    {
        let telemetry = FetchTelemetry::new(project, url);
        let start_time = Timestamp::now();
        let start = Instant::now();
        telemetry.emit_start(start_time);

        let max_attempts = self.policy.max_attempts.max(1);
        let mut state = AttemptState::start();
        let mut delivered: Option<(ResponseBody, ResponseMeta)> = None;
        let mut last_failure: Option<AttemptFailure> = None;

        while !state.is_terminal() {
            match state {
                AttemptState::Attempting { attempt } => match self.attempt(transport, url).await {
                    Ok(response) => {
                        delivered = Some(response);
                        state = state.after_attempt(Verdict::Success, max_attempts);
                    }
                    Err(failure) => {
                        telemetry.emit_attempt_failed(attempt, &failure);
                        let verdict = if self.policy.is_retriable(&failure) {
                            Verdict::Retryable
                        } else {
                            Verdict::Fatal
                        };
                        state = state.after_attempt(verdict, max_attempts);
                        last_failure = Some(failure);
                    }
                },
                AttemptState::WaitingBetweenAttempts { attempts_made } => {
                    let delay = {
                        let mut rng = self.rng.lock().await;
                        self.policy.delay_after_attempt(attempts_made, &mut *rng)
                    };
                    if let Some(failure) = &last_failure {
                        telemetry.emit_retry(attempts_made, max_attempts, delay, failure);
                    }
                    tokio::time::sleep(delay).await;
                    state = state.after_delay();
                }
                AttemptState::Succeeded { .. } | AttemptState::Exhausted { .. } => {}
            }
        }

        let elapsed = start.elapsed();
        let attempts = state.attempts();

        match (state, delivered) {
            (AttemptState::Succeeded { .. }, Some((body, meta))) => {
                let outcome =
                    FetchOutcome::succeeded(project, url, start_time, elapsed, attempts, &meta);
                telemetry.emit_success(attempts, meta.status, elapsed);
                let call_id = self.record(&outcome, &telemetry).await;
                Ok(Fetched {
                    body,
                    status: meta.status,
                    final_url: meta.final_url,
                    size: meta.size,
                    attempts,
                    elapsed,
                    call_id,
                })
            }
            _ => {
                let outcome = FetchOutcome::failed(
                    project,
                    url,
                    start_time,
                    elapsed,
                    attempts,
                    last_failure.as_ref(),
                );
                let last_error = outcome.error.clone().unwrap_or_default();
                telemetry.emit_failure(attempts, &last_error, elapsed);
                self.record(&outcome, &telemetry).await;
                Err(Error::Exhausted {
                    url: url.to_string(),
                    attempts,
                    last_error,
                })
            }
        }
    }

    async fn attempt<T>(
        &self,
        transport: &T,
        url: &str,
    ) -> Result<(ResponseBody, ResponseMeta), AttemptFailure>
    where
        T: Transport + Sync,
    {
        let timeout = self.policy.attempt_timeout();
        let response = match timeout {
            Some(limit) => tokio::time::timeout(limit, transport.get(url, timeout))
                .await
                .map_err(|_| AttemptFailure::Timeout)??,
            None => transport.get(url, None).await?,
        };
        classify_response(response)
    }

    async fn record(&self, outcome: &FetchOutcome, telemetry: &FetchTelemetry) -> Option<u64> {
        match self.logger.record(outcome).await {
            Ok(call_id) => Some(call_id),
            Err(err) => {
                telemetry.emit_log_failure(&err);
                None
            }
        }
    }
}

use std::time::Duration;

use jiff::Timestamp;
use serde::Serialize;

use crate::transport::AttemptFailure;
use crate::types::ResponseMeta;

/// Terminal disposition of one logical GET, handed to the call log exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub project: String,
    pub start_time: Timestamp,
    pub elapsed: Duration,
    pub url: String,
    pub redirect_url: Option<String>,
    pub response_size: Option<u64>,
    pub response_code: Option<u16>,
    pub success: bool,
    pub error: Option<String>,
    #[serde(skip)]
    pub attempts: u32,
}

impl FetchOutcome {
    pub fn succeeded(
        project: &str,
        url: &str,
        start_time: Timestamp,
        elapsed: Duration,
        attempts: u32,
        meta: &ResponseMeta,
    ) -> Self {
        Self {
            project: project.to_string(),
            start_time,
            elapsed,
            url: url.to_string(),
            redirect_url: meta.final_url.clone(),
            response_size: Some(meta.size),
            response_code: Some(meta.status),
            success: true,
            error: None,
            attempts,
        }
    }

    /// Built from the last attempt's failure; response fields are present only if
    /// that attempt received a response.
    pub fn failed(
        project: &str,
        url: &str,
        start_time: Timestamp,
        elapsed: Duration,
        attempts: u32,
        last_failure: Option<&AttemptFailure>,
    ) -> Self {
        let meta = last_failure.and_then(AttemptFailure::meta);
        let error = last_failure
            .map(ToString::to_string)
            .unwrap_or_else(|| "no attempt was made".to_string());
        Self {
            project: project.to_string(),
            start_time,
            elapsed,
            url: url.to_string(),
            redirect_url: meta.and_then(|m| m.final_url.clone()),
            response_size: meta.map(|m| m.size),
            response_code: meta.map(|m| m.status),
            success: false,
            error: Some(error),
            attempts,
        }
    }
}

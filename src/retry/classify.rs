use reqwest::StatusCode;

use crate::transport::{AttemptFailure, TransportResponse};
use crate::types::{ResponseBody, ResponseMeta};

use super::plan::RetryPolicy;

/// Turns a raw response into a parsed body, or the failure it represents.
pub fn classify_response(
    response: TransportResponse,
) -> Result<(ResponseBody, ResponseMeta), AttemptFailure> {
    let meta = ResponseMeta {
        status: response.status,
        final_url: response.final_url,
        size: response.body.len() as u64,
    };

    if !(200..300).contains(&response.status) {
        let reason = StatusCode::from_u16(response.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        return Err(AttemptFailure::Status { meta, reason });
    }

    let is_json = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

    if response.body.is_empty() {
        return Ok((ResponseBody::Text(String::new()), meta));
    }

    let body = if is_json {
        serde_json::from_slice(&response.body)
            .map(ResponseBody::Json)
            .map_err(|err| err.to_string())
    } else {
        String::from_utf8(response.body)
            .map(ResponseBody::Text)
            .map_err(|err| err.to_string())
    };

    match body {
        Ok(body) => Ok((body, meta)),
        Err(message) => Err(AttemptFailure::Decode { meta, message }),
    }
}

impl RetryPolicy {
    pub fn is_retriable(&self, failure: &AttemptFailure) -> bool {
        match failure {
            AttemptFailure::Status { meta, .. } => self.status_retry.is_retryable(meta.status),
            AttemptFailure::Timeout
            | AttemptFailure::Connection(_)
            | AttemptFailure::Decode { .. }
            | AttemptFailure::Other(_) => true,
        }
    }
}

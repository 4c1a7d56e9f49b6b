//! The network collaborator a [`Fetcher`](crate::fetcher::Fetcher) delegates each attempt to.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::types::ResponseMeta;

/// Raw response of a single attempt, before status and body are judged.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub final_url: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Closed set of ways one attempt can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    Timeout,
    Connection(String),
    Status { meta: ResponseMeta, reason: String },
    Decode { meta: ResponseMeta, message: String },
    Other(String),
}

impl AttemptFailure {
    /// Metadata of the response, if one was received before the attempt failed.
    pub fn meta(&self) -> Option<&ResponseMeta> {
        match self {
            AttemptFailure::Status { meta, .. } | AttemptFailure::Decode { meta, .. } => Some(meta),
            AttemptFailure::Timeout | AttemptFailure::Connection(_) | AttemptFailure::Other(_) => {
                None
            }
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Timeout => write!(f, "timeout"),
            AttemptFailure::Connection(msg) | AttemptFailure::Other(msg) => write!(f, "{msg}"),
            AttemptFailure::Status { meta, reason } if reason.is_empty() => {
                write!(f, "HTTP {}", meta.status)
            }
            AttemptFailure::Status { meta, reason } => write!(f, "HTTP {} {}", meta.status, reason),
            AttemptFailure::Decode { message, .. } => write!(f, "invalid response body: {message}"),
        }
    }
}

/// An async GET capable of honouring a per-attempt timeout.
///
/// Implementations must be safe to share between concurrent logical calls.
pub trait Transport {
    fn get(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<TransportResponse, AttemptFailure>> + Send;
}

impl Transport for reqwest::Client {
    fn get(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<TransportResponse, AttemptFailure>> + Send {
        let mut request = reqwest::Client::get(self, url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        async move {
            let response = request.send().await.map_err(classify_reqwest_error)?;
            let status = response.status().as_u16();
            let final_url = Some(response.url().to_string());
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await.map_err(classify_reqwest_error)?;
            Ok(TransportResponse {
                status,
                final_url,
                content_type,
                body: body.to_vec(),
            })
        }
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> AttemptFailure {
    if err.is_timeout() {
        AttemptFailure::Timeout
    } else if err.is_connect() {
        AttemptFailure::Connection(err.to_string())
    } else {
        AttemptFailure::Other(err.to_string())
    }
}

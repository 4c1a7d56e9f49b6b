use std::time::Duration;

use serde::Serialize;

/// Decoded response body. JSON when the server declares a JSON content type, text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }
}

/// Response metadata that ends up in the call log, whether or not the attempt succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub final_url: Option<String>,
    pub size: u64,
}

/// Result of a successful logical GET.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: ResponseBody,
    pub status: u16,
    pub final_url: Option<String>,
    pub size: u64,
    pub attempts: u32,
    pub elapsed: Duration,
    /// `None` when the log row could not be written.
    pub call_id: Option<u64>,
}

//! Reliable single-URL HTTP GETs with bounded retries, a per-attempt timeout
//! and one `;`-delimited log row per logical call.

pub mod call_log;
pub mod config;
mod connector;
pub mod errors;
pub mod fetcher;
pub mod rate_limit;
pub mod retry;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use call_log::{CallLogger, LogEntry, read_log};
pub use config::Config;
pub use connector::AsyncConnector;
pub use errors::Error;
pub use fetcher::Fetcher;
pub use retry::{FetchOutcome, RetryPolicy};
pub use transport::{AttemptFailure, Transport, TransportResponse};
pub use types::{Fetched, ResponseBody};

#[cfg(test)]
mod tests;

mod classify;
mod outcome;
mod plan;
mod state;

pub use classify::classify_response;
pub use outcome::FetchOutcome;
pub use plan::{Backoff, JitterStrategy, RetryPolicy, StatusRetry};
pub use state::{AttemptState, Verdict};

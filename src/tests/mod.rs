
use std::sync::Arc;
use std::time::Duration;

use crate::call_log::CallLogger;
use crate::fetcher::Fetcher;
use crate::retry::RetryPolicy;

pub(crate) async fn fetcher_with(policy: RetryPolicy, name: &str) -> (Fetcher, std::path::PathBuf) {
    let path = test_support::temp_log_path(name);
    let logger = CallLogger::open(&path, true)
        .await
        .expect("log should open");
    (Fetcher::new(policy, Arc::new(logger)), path)
}

pub(crate) fn policy(max_attempts: u32, timeout_secs: u64, delay_secs: u64) -> RetryPolicy {
    RetryPolicy::new(
        max_attempts,
        Duration::from_secs(timeout_secs),
        Duration::from_secs(delay_secs),
    )
    .expect("valid policy")
}

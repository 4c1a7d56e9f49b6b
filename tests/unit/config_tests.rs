use std::time::Duration;

use async_connector::Config;
use async_connector::errors::Error;
use async_connector::retry::{Backoff, JitterStrategy, StatusRetry};

#[test]
fn defaults_match_the_connector() {
    let cfg = Config::new("calls.log");
    assert!(!cfg.overwrite_log);
    assert_eq!(cfg.n_tries, 10);
    assert_eq!(cfg.timeout, 30.0);

    let policy = cfg.retry_policy().unwrap();
    assert_eq!(policy.max_attempts, 10);
    assert_eq!(policy.timeout, Duration::from_secs(30));
    assert_eq!(policy.delay, Duration::from_secs(1));
    assert_eq!(policy.status_retry, StatusRetry::AnyNon2xx);
    assert_eq!(policy.jitter, None);
}

#[test]
fn reads_json_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("async-connector-config-{}.json", uuid::Uuid::new_v4()));
    let cfg = serde_json::json!({
        "logfile": "/tmp/calls.log",
        "overwrite_log": true,
        "n_tries": 4,
        "timeout": 2.5,
        "retry_delay": 0.5,
        "backoff": "quadratic",
        "max_retry_delay": 8.0,
        "jitter": "full",
        "status_retry": "server_errors_and_throttling"
    });
    std::fs::write(&path, cfg.to_string()).unwrap();

    let cfg = Config::from_file(&path).expect("valid config");
    assert!(cfg.overwrite_log);
    assert_eq!(cfg.backoff, Backoff::Quadratic);

    let policy = cfg.retry_policy().unwrap();
    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.timeout, Duration::from_millis(2_500));
    assert_eq!(policy.max_delay, Some(Duration::from_secs(8)));
    assert_eq!(policy.status_retry, StatusRetry::ServerErrorsAndThrottling);
    assert_eq!(policy.jitter, Some(JitterStrategy::Full));
}

#[test]
fn jitter_builder_reaches_the_policy() {
    let policy = Config::new("x.log")
        .with_jitter(JitterStrategy::Decorrelated)
        .retry_policy()
        .unwrap();
    assert_eq!(policy.jitter, Some(JitterStrategy::Decorrelated));

    let err = serde_json::from_str::<Config>(r#"{"logfile": "x.log", "jitter": "sometimes"}"#)
        .unwrap_err();
    assert!(err.is_data());
}

#[test]
fn invalid_values_are_config_errors() {
    let err = Config::new("x.log").with_n_tries(0).validate().unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = Config::new("x.log").with_timeout(-1.0).retry_policy().unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = Config::new("x.log")
        .with_retry_delay(f64::NAN)
        .validate()
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

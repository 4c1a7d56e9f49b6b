use std::time::Duration;

use rand::SeedableRng;

use async_connector::errors::Error;
use async_connector::retry::{Backoff, JitterStrategy, RetryPolicy};

fn rng() -> rand::rngs::StdRng {
    rand::rngs::StdRng::seed_from_u64(7)
}

#[test]
fn zero_attempts_is_rejected() {
    let err = RetryPolicy::new(0, Duration::from_secs(1), Duration::ZERO)
        .expect_err("at least one attempt");
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn constant_backoff_repeats_the_base_delay() {
    let plan = RetryPolicy::new(5, Duration::from_secs(1), Duration::from_millis(300)).unwrap();
    let mut rng = rng();
    for attempt in 1..5 {
        assert_eq!(plan.delay_after_attempt(attempt, &mut rng), Duration::from_millis(300));
    }
}

#[test]
fn quadratic_backoff_grows_and_respects_cap() {
    let plan = RetryPolicy::new(6, Duration::from_secs(1), Duration::from_millis(100))
        .unwrap()
        .with_backoff(Backoff::Quadratic)
        .with_max_delay(Duration::from_millis(1_000));
    let mut rng = rng();
    assert_eq!(plan.delay_after_attempt(1, &mut rng), Duration::from_millis(100));
    assert_eq!(plan.delay_after_attempt(2, &mut rng), Duration::from_millis(400));
    assert_eq!(plan.delay_after_attempt(3, &mut rng), Duration::from_millis(900));
    assert_eq!(plan.delay_after_attempt(4, &mut rng), Duration::from_millis(1_000));
}

#[test]
fn linear_backoff_scales_with_attempts() {
    let plan = RetryPolicy::new(4, Duration::from_secs(1), Duration::from_millis(250))
        .unwrap()
        .with_backoff(Backoff::Linear);
    let mut rng = rng();
    assert_eq!(plan.delay_after_attempt(3, &mut rng), Duration::from_millis(750));
}

#[test]
fn jitter_stays_within_bounds() {
    let plan = RetryPolicy::new(5, Duration::from_secs(1), Duration::from_millis(40))
        .unwrap()
        .with_jitter(JitterStrategy::Decorrelated);
    let mut rng = rng();
    for attempt in 1..5 {
        let delay = plan.delay_after_attempt(attempt, &mut rng);
        assert!(delay >= Duration::from_millis(20));
        assert!(delay <= Duration::from_millis(60));
    }
}

#[test]
fn zero_timeout_disables_attempt_timeout() {
    let plan = RetryPolicy::new(1, Duration::ZERO, Duration::ZERO).unwrap();
    assert_eq!(plan.attempt_timeout(), None);
    let plan = RetryPolicy::new(1, Duration::from_secs(3), Duration::ZERO).unwrap();
    assert_eq!(plan.attempt_timeout(), Some(Duration::from_secs(3)));
}

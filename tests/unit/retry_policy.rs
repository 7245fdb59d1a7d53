use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use web3_utils::config::RetryConfig;
use web3_utils::errors::BeaconError;
use web3_utils::retry::{is_retryable_beacon_error, CallSite, RetryPolicy, StopCondition};

use crate::common::{fast_policy, http_error};

/// Tests for retry policies shared across tasks and built from configuration

#[tokio::test]
async fn test_shutdown_flag_raised_mid_retry_stops_the_loop() {
    let shutdown = Arc::new(AtomicBool::new(false));
    let policy = fast_policy(StopCondition::OnSignal(shutdown.clone()));
    let attempts = AtomicUsize::new(0);

    let result: Result<(), BeaconError> = policy
        .execute(&CallSite::new("get_syncing", ()), is_retryable_beacon_error, || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt == 2 {
                shutdown.store(true, Ordering::SeqCst);
            }
            async { Err(http_error(503)) }
        })
        .await;

    assert_eq!(result.unwrap_err().status(), Some(503));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_delay_limit_bounds_retries() {
    let policy = RetryPolicy::new(
        Duration::from_millis(20),
        StopCondition::AfterDelay(Duration::from_millis(50)),
    );
    let attempts = AtomicUsize::new(0);

    let result: Result<(), BeaconError> = policy
        .execute(&CallSite::new("get_genesis", ()), is_retryable_beacon_error, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(BeaconError::Connection("refused".to_string())) }
        })
        .await;

    assert!(matches!(result, Err(BeaconError::Connection(_))));
    let made = attempts.load(Ordering::SeqCst);
    assert!((2..=5).contains(&made), "made {} attempts", made);
}

#[tokio::test]
async fn test_one_policy_serves_concurrent_tasks() {
    let policy = fast_policy(StopCondition::AfterAttempt(3));

    let tasks: Vec<_> = (0..4)
        .map(|task| {
            let policy = policy.clone();
            tokio::spawn(async move {
                let attempts = AtomicUsize::new(0);
                let result: Result<usize, BeaconError> = policy
                    .execute(&CallSite::new("task", task), is_retryable_beacon_error, || {
                        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                        async move {
                            if attempt < 3 {
                                Err(http_error(429))
                            } else {
                                Ok(attempt)
                            }
                        }
                    })
                    .await;
                result
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 3);
    }
}

#[test]
fn test_retry_config_limits() {
    let policy = RetryConfig {
        wait_seconds: 2,
        max_attempts: Some(4),
        max_delay_seconds: Some(60),
    }
    .to_policy();

    assert_eq!(policy.wait(), Duration::from_secs(2));
    assert!(matches!(policy.stop(), StopCondition::AfterAttempt(4)));

    let policy = RetryConfig {
        wait_seconds: 5,
        max_attempts: None,
        max_delay_seconds: Some(60),
    }
    .to_policy();
    assert!(matches!(policy.stop(), StopCondition::AfterDelay(d) if *d == Duration::from_secs(60)));
}

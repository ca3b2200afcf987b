//! Retry executor and backoff policy behaviour through the public API.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use grant_harvester::{retry_blocking, retry_with_backoff, PersistError, RetryConfig};
use proptest::prelude::*;

fn fast_config(max_retries: u32) -> RetryConfig {
    RetryConfig::new()
        .with_max_retries(max_retries)
        .with_initial_delay(Duration::from_millis(10))
        .with_jitter(false)
}

#[tokio::test]
async fn fails_twice_then_succeeds() {
    let calls = AtomicU32::new(0);
    let calls = &calls;

    let result = retry_with_backoff(&fast_config(2), move || async move {
        match calls.fetch_add(1, Ordering::SeqCst) {
            0 | 1 => Err(PersistError::Status(503)),
            _ => Ok("saved"),
        }
    })
    .await;

    assert_eq!(result.unwrap(), "saved");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhaustion_propagates_last_error() {
    let calls = AtomicU32::new(0);
    let calls = &calls;

    let result: Result<(), PersistError> = retry_with_backoff(&fast_config(3), move || async move {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Err(PersistError::Status(500 + n as u16))
    })
    .await;

    assert!(matches!(result, Err(PersistError::Status(503))));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let calls = AtomicU32::new(0);
    let calls = &calls;

    let result: Result<(), PersistError> = retry_with_backoff(&fast_config(3), move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(PersistError::Status(401))
    })
    .await;

    assert!(matches!(result, Err(PersistError::Status(401))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_retries_do_not_block_each_other() {
    let config = RetryConfig::new()
        .with_max_retries(1)
        .with_initial_delay(Duration::from_millis(100))
        .with_jitter(false);

    let run = |config: RetryConfig| async move {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        retry_with_backoff(&config, move || async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Err(PersistError::Status(503)),
                _ => Ok(()),
            }
        })
        .await
    };

    let start = std::time::Instant::now();
    let results = futures::future::join_all((0..10).map(|_| run(config.clone()))).await;
    assert!(results.iter().all(|r| r.is_ok()));
    // Ten sequential waits would take at least one second.
    assert!(start.elapsed() < Duration::from_millis(900));
}

#[test]
fn blocking_variant_outside_runtime() {
    let mut calls = 0;
    let result = retry_blocking(&fast_config(2), || {
        calls += 1;
        if calls < 3 {
            Err(PersistError::Status(429))
        } else {
            Ok(calls)
        }
    });
    assert_eq!(result.unwrap(), 3);
}

#[test]
fn async_retry_under_block_on() {
    let calls = AtomicU32::new(0);
    let calls = &calls;
    let result: Result<u32, PersistError> = tokio_test::block_on(retry_with_backoff(
        &fast_config(1),
        move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) },
    ));
    assert_eq!(result.unwrap(), 1);
}

proptest! {
    #[test]
    fn delay_is_exact_and_monotonic(
        initial_ms in 1u64..=2_000,
        max_ms in 1u64..=60_000,
        attempt in 0u32..30,
    ) {
        let config = RetryConfig::new()
            .with_initial_delay(Duration::from_millis(initial_ms))
            .with_max_delay(Duration::from_millis(max_ms))
            .with_exponential_base(2.0)
            .with_jitter(false);

        let grown = u128::from(initial_ms) << attempt;
        let expected = Duration::from_millis(grown.min(u128::from(max_ms)) as u64);

        prop_assert_eq!(config.delay(attempt), expected);
        prop_assert!(config.delay(attempt) <= config.delay(attempt + 1));
    }

    #[test]
    fn jittered_delay_stays_in_band(
        initial_ms in 1u64..=2_000,
        attempt in 0u32..10,
    ) {
        let config = RetryConfig::new()
            .with_initial_delay(Duration::from_millis(initial_ms))
            .with_max_delay(Duration::from_secs(600));
        let raw = config.clone().with_jitter(false).delay(attempt).as_secs_f64();
        let jittered = config.delay(attempt).as_secs_f64();

        prop_assert!(jittered >= raw * 0.9 - 1e-9);
        prop_assert!(jittered <= raw * 1.1 + 1e-9);
    }
}

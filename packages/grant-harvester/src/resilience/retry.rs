//! Retry executor.
//!
//! Two entry points share one decision function: the async variant waits on
//! `tokio::time::sleep` and never blocks other tasks, the blocking variant
//! sleeps the calling thread only.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::backoff::RetryConfig;
use crate::error::Retryable;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Wait(Duration),
    Propagate,
}

fn after_failure(config: &RetryConfig, attempt: u32, retryable: bool, err: &dyn Display) -> Next {
    if !retryable {
        error!(attempt = attempt + 1, error = %err, "non-retryable failure");
        return Next::Propagate;
    }

    if attempt >= config.max_retries {
        error!(
            attempts = config.max_attempts(),
            error = %err,
            "all retries exhausted"
        );
        return Next::Propagate;
    }

    let delay = config.delay(attempt);
    warn!(
        attempt = attempt + 1,
        delay_ms = delay.as_millis() as u64,
        error = %err,
        "attempt failed, retrying"
    );
    Next::Wait(delay)
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent. Retryability comes from [`Retryable`].
pub async fn retry_with_backoff<T, E, F, Fut>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    retry_with_backoff_if(config, E::is_retryable, operation).await
}

/// Like [`retry_with_backoff`] with a caller-supplied classification.
///
/// The last error is returned unchanged once retries are exhausted.
pub async fn retry_with_backoff_if<T, E, F, Fut, C>(
    config: &RetryConfig,
    is_retryable: C,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 0;
    loop {
        debug!(attempt = attempt + 1, of = config.max_attempts(), "attempt");
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let next = after_failure(config, attempt, is_retryable(&err), &err);
        match next {
            Next::Wait(delay) => {
                drop(err);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Next::Propagate => return Err(err),
        }
    }
}

/// Blocking counterpart of [`retry_with_backoff`]. Sleeps the current thread.
pub fn retry_blocking<T, E, F>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Retryable + Display,
{
    retry_blocking_if(config, E::is_retryable, operation)
}

/// Blocking counterpart of [`retry_with_backoff_if`].
pub fn retry_blocking_if<T, E, F, C>(
    config: &RetryConfig,
    is_retryable: C,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    C: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 0;
    loop {
        debug!(attempt = attempt + 1, of = config.max_attempts(), "attempt");
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) => match after_failure(config, attempt, is_retryable(&err), &err) {
                Next::Wait(delay) => {
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Next::Propagate => return Err(err),
            },
        }
    }
}

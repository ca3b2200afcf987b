//! Bounded exponential backoff for unreliable remote calls.

pub mod backoff;
pub mod retry;

pub use backoff::RetryConfig;
pub use retry::{retry_blocking, retry_blocking_if, retry_with_backoff, retry_with_backoff_if};

//! Typed errors for the harvester library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so orchestrators can
//! match on failure kinds when deciding between fallback, retry and surfacing.

use std::time::Duration;

use thiserror::Error;

/// Failures signalled by a text-generation capability.
#[derive(Debug, Error)]
pub enum AiError {
    /// The call did not answer before its deadline.
    #[error("AI call timed out after {0:?}")]
    Timeout(Duration),

    /// The answer could not be parsed or did not satisfy the record invariants.
    #[error("invalid AI response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure (connection refused, reset, DNS).
    #[error("AI request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provider answered with a non-success status.
    #[error("AI provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// No credential or model is available.
    #[error("AI capability not configured")]
    NotConfigured,
}

/// Failures signalled by a text-search capability.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed
    #[error("search request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider returned a non-success status
    #[error("search provider returned status {0}")]
    Status(u16),

    /// Response body did not match the expected shape
    #[error("could not decode search response: {0}")]
    Decode(String),
}

/// Failures while pushing a discovered source to the backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("persist request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("backend returned status {0}")]
    Status(u16),
}

/// A record or source could not be constructed because a field is out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field length (in characters) outside the allowed range
    #[error("{field} must be {min}..={max} characters, got {actual}")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// Amount was negative or not an integer
    #[error("amount must be a non-negative integer, got {0}")]
    Amount(String),
}

/// Classification used by the resilience layer.
///
/// Only kinds that report `true` are re-attempted by
/// [`retry_with_backoff`](crate::resilience::retry_with_backoff); every other
/// failure propagates on the first occurrence.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl Retryable for AiError {
    fn is_retryable(&self) -> bool {
        match self {
            AiError::Timeout(_) | AiError::Request(_) => true,
            AiError::Status { status, .. } => is_transient_status(*status),
            AiError::InvalidResponse(_) | AiError::NotConfigured => false,
        }
    }
}

impl Retryable for SearchError {
    fn is_retryable(&self) -> bool {
        match self {
            SearchError::Http(_) => true,
            SearchError::Status(status) => is_transient_status(*status),
            SearchError::Decode(_) => false,
        }
    }
}

impl Retryable for PersistError {
    fn is_retryable(&self) -> bool {
        match self {
            PersistError::Http(_) => true,
            PersistError::Status(status) => is_transient_status(*status),
        }
    }
}

/// Result type alias for text-generation calls.
pub type AiResult<T> = std::result::Result<T, AiError>;

/// Result type alias for search calls.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

//! Web search capability used by discovery.
//!
//! Abstracts over search providers (Tavily, SerpAPI, DuckDuckGo, ...). The
//! discovery orchestrator treats every failure as "no results for this
//! query" and moves on to the next one, so implementations should not retry
//! internally.

use async_trait::async_trait;

use crate::error::SearchResult;
use crate::types::source::CandidateSource;

/// Opaque "text search" capability.
///
/// # Implementations
///
/// - `TavilySearcher` - Tavily API
/// - `MockSearcher` - For testing
#[async_trait]
pub trait TextSearcher: Send + Sync {
    /// Search the web for `query`, returning at most `limit` candidates in
    /// provider order.
    async fn search(&self, query: &str, limit: usize) -> SearchResult<Vec<CandidateSource>>;
}

//! Per-query search with failure containment.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::traits::searcher::TextSearcher;
use crate::types::source::CandidateSource;

/// Runs one search query against a [`TextSearcher`].
///
/// Provider errors and timeouts degrade to an empty result for that query;
/// they are never retried here and never abort a discovery run.
#[derive(Clone)]
pub struct CandidateSearch {
    searcher: Arc<dyn TextSearcher>,
    timeout: Duration,
}

impl CandidateSearch {
    pub fn new(searcher: Arc<dyn TextSearcher>, timeout: Duration) -> Self {
        Self { searcher, timeout }
    }

    pub async fn run(&self, query: &str, limit: usize) -> Vec<CandidateSource> {
        match tokio::time::timeout(self.timeout, self.searcher.search(query, limit)).await {
            Ok(Ok(candidates)) => {
                debug!(query = %query, results = candidates.len(), "search completed");
                candidates
            }
            Ok(Err(e)) => {
                warn!(query = %query, error = %e, "search failed, skipping query");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    query = %query,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "search timed out, skipping query"
                );
                Vec::new()
            }
        }
    }
}

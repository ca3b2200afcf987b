//! Configuration types for extraction and discovery.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Hard deadline for one AI extraction call.
    ///
    /// On expiry the call is abandoned and the heuristic tier runs.
    /// Default: 10 seconds.
    pub ai_timeout: Duration,

    /// Number of HTML characters embedded in the AI prompt.
    ///
    /// Default: 5,000.
    pub max_prompt_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ai_timeout: Duration::from_secs(10),
            max_prompt_chars: 5_000,
        }
    }
}

impl ExtractionConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AI deadline.
    pub fn with_ai_timeout(mut self, timeout: Duration) -> Self {
        self.ai_timeout = timeout;
        self
    }

    /// Set the prompt HTML prefix length.
    pub fn with_max_prompt_chars(mut self, chars: usize) -> Self {
        self.max_prompt_chars = chars;
        self
    }
}

/// Configuration for source discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Deadline for one AI validation call. Default: 10 seconds.
    pub validation_timeout: Duration,

    /// Deadline for one search query. A query that overruns is skipped.
    /// Default: 30 seconds.
    pub search_timeout: Duration,

    /// Result budget used when a request does not give one. Default: 20.
    pub default_max_results: usize,

    /// Upper bound accepted for a request's result budget. Default: 100.
    pub max_results_limit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            validation_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(30),
            default_max_results: 20,
            max_results_limit: 100,
        }
    }
}

impl DiscoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    pub fn with_max_results_limit(mut self, limit: usize) -> Self {
        self.max_results_limit = limit;
        self
    }
}

//! Discovery of funding sources from web search.
//!
//! A run generates queries for a scope, searches them strictly in order,
//! canonicalizes and deduplicates candidate URLs, optionally filters by
//! domain, scores each survivor and stops once the result budget is met.
//! The dedup set lives on the stack of one [`DiscoveryOrchestrator::discover`]
//! call, so concurrent runs never see each other's state.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::canonical::{canonicalize_url, is_official_domain};
use super::queries::{build_queries, DiscoveryScope};
use super::scoring::{heuristic_confidence, CandidateValidator};
use super::search::CandidateSearch;
use crate::traits::generator::TextGenerator;
use crate::traits::searcher::TextSearcher;
use crate::types::config::DiscoveryConfig;
use crate::types::source::{CandidateSource, DiscoveredSource, ValidationHints};

/// Parameters of one discovery run.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryRequest {
    /// Scope label. Unknown labels use the europa query set but are kept
    /// verbatim for scoring and validation prompts.
    pub scope: String,
    pub regions: Vec<String>,
    pub max_results: usize,
    pub use_ai_validation: bool,
    /// Keep only hosts carrying a trust marker. Off by default.
    pub use_domain_filter: bool,
}

impl Default for DiscoveryRequest {
    fn default() -> Self {
        Self {
            scope: DiscoveryScope::default().to_string(),
            regions: Vec::new(),
            max_results: DiscoveryConfig::default().default_max_results,
            use_ai_validation: true,
            use_domain_filter: false,
        }
    }
}

impl DiscoveryRequest {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Default::default()
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_ai_validation(mut self, enabled: bool) -> Self {
        self.use_ai_validation = enabled;
        self
    }

    pub fn with_domain_filter(mut self, enabled: bool) -> Self {
        self.use_domain_filter = enabled;
        self
    }
}

/// Drives search, dedup, filtering and scoring for discovery runs.
#[derive(Clone)]
pub struct DiscoveryOrchestrator {
    search: CandidateSearch,
    searcher: Arc<dyn TextSearcher>,
    validator: Option<CandidateValidator>,
    config: DiscoveryConfig,
}

impl DiscoveryOrchestrator {
    pub fn new(searcher: Arc<dyn TextSearcher>) -> Self {
        let config = DiscoveryConfig::default();
        Self {
            search: CandidateSearch::new(searcher.clone(), config.search_timeout),
            searcher,
            validator: None,
            config,
        }
    }

    /// Enable AI validation through `generator`.
    pub fn with_validator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.validator = Some(CandidateValidator::new(
            generator,
            self.config.validation_timeout,
        ));
        self
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.search = CandidateSearch::new(self.searcher.clone(), config.search_timeout);
        self.validator = self
            .validator
            .map(|v| v.with_timeout(config.validation_timeout));
        self.config = config;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Run one discovery request.
    ///
    /// Returns at most `max_results` sources (capped by the configured limit)
    /// in query order, then result order. Never fails: unusable queries and
    /// candidates are skipped.
    pub async fn discover(&self, request: &DiscoveryRequest) -> Vec<DiscoveredSource> {
        let max_results = request.max_results.min(self.config.max_results_limit);
        let queries = build_queries(DiscoveryScope::from_label(&request.scope), &request.regions);

        info!(
            scope = %request.scope,
            regions = ?request.regions,
            max_results,
            queries = queries.len(),
            "starting source discovery"
        );

        let mut seen: HashSet<String> = HashSet::new();
        let mut discovered: Vec<DiscoveredSource> = Vec::new();

        if max_results == 0 {
            return discovered;
        }

        'queries: for query in &queries {
            for candidate in self.search.run(query, max_results).await {
                let Some(base_url) = canonicalize_url(&candidate.raw_url) else {
                    debug!(url = %candidate.raw_url, "discarding unparseable candidate URL");
                    continue;
                };

                if !seen.insert(base_url.clone()) {
                    debug!(url = %base_url, "discarding duplicate candidate");
                    continue;
                }

                if request.use_domain_filter && !is_official_domain(&base_url) {
                    debug!(url = %base_url, "discarding candidate outside trusted domains");
                    continue;
                }

                let (confidence, hints) = self.score(&candidate, request).await;
                discovered.push(DiscoveredSource::from_candidate(
                    &candidate, base_url, confidence, hints,
                ));

                if discovered.len() >= max_results {
                    debug!(query = %query, "result budget reached, stopping discovery");
                    break 'queries;
                }
            }
        }

        info!(
            scope = %request.scope,
            discovered = discovered.len(),
            "source discovery finished"
        );
        discovered
    }

    async fn score(
        &self,
        candidate: &CandidateSource,
        request: &DiscoveryRequest,
    ) -> (f64, ValidationHints) {
        match &self.validator {
            Some(validator) if request.use_ai_validation => {
                validator.validate(candidate, &request.scope).await
            }
            _ => (
                heuristic_confidence(candidate, &request.scope),
                ValidationHints::default(),
            ),
        }
    }
}

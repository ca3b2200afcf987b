//! Testing utilities including mock implementations.
//!
//! These let applications exercise extraction and discovery without making
//! real model, search or backend calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{AiError, AiResult, SearchError, SearchResult};
use crate::traits::{generator::TextGenerator, searcher::TextSearcher, sink::SourceSink};
use crate::types::source::{CandidateSource, DiscoveredSource};

/// A mock text generator.
///
/// Answers with a fixed reply, or with the first reply whose key is a
/// substring of the prompt. Every prompt is recorded, including those whose
/// answer is later abandoned by a timeout.
pub struct MockGenerator {
    default_reply: String,

    /// (prompt substring, reply) pairs, checked in insertion order
    rules: Vec<(String, String)>,

    delay: Option<Duration>,
    fail: bool,

    /// Call tracking for assertions
    prompts: Arc<RwLock<Vec<String>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            default_reply: "{}".to_string(),
            rules: Vec::new(),
            delay: None,
            fail: false,
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl MockGenerator {
    /// Create a mock that answers `{}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every prompt with `reply`.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Answer prompts containing `needle` with `reply`.
    pub fn with_reply_for(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), reply.into()));
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with a transport error.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.prompts.write().unwrap().clear();
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> AiResult<String> {
        self.prompts.write().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(AiError::Request(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock generator failure",
            ))));
        }

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone());
        Ok(reply)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock web searcher with per-query results.
#[derive(Default)]
pub struct MockSearcher {
    /// Predefined results by exact query
    results: HashMap<String, Vec<CandidateSource>>,

    /// Results for queries without an exact entry
    default_results: Vec<CandidateSource>,

    failing: HashSet<String>,
    delay: Option<Duration>,

    /// Queries received, in order
    queries: Arc<RwLock<Vec<String>>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results for one exact query.
    pub fn with_results(mut self, query: impl Into<String>, results: Vec<CandidateSource>) -> Self {
        self.results.insert(query.into(), results);
        self
    }

    /// Results for every query without an exact entry.
    pub fn with_default_results(mut self, results: Vec<CandidateSource>) -> Self {
        self.default_results = results;
        self
    }

    /// Make one query fail with a provider error.
    pub fn with_failing_query(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl TextSearcher for MockSearcher {
    async fn search(&self, query: &str, limit: usize) -> SearchResult<Vec<CandidateSource>> {
        self.queries.write().unwrap().push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(query) {
            return Err(SearchError::Status(503));
        }

        Ok(self
            .results
            .get(query)
            .unwrap_or(&self.default_results)
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}

/// A mock persistence sink that records what it receives.
pub struct MockSink {
    accept: bool,
    persisted: Arc<RwLock<Vec<DiscoveredSource>>>,
}

impl Default for MockSink {
    fn default() -> Self {
        Self {
            accept: true,
            persisted: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every source, as an unconfigured backend would.
    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Default::default()
        }
    }

    /// Sources received so far, accepted or not.
    pub fn persisted(&self) -> Vec<DiscoveredSource> {
        self.persisted.read().unwrap().clone()
    }
}

#[async_trait]
impl SourceSink for MockSink {
    async fn persist(&self, source: &DiscoveredSource) -> bool {
        self.persisted.write().unwrap().push(source.clone());
        self.accept
    }
}

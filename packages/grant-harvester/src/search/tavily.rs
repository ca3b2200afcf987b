//! Tavily-backed [`TextSearcher`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SearchError, SearchResult};
use crate::security::SecretString;
use crate::traits::searcher::TextSearcher;
use crate::types::source::CandidateSource;

const DEFAULT_ENDPOINT: &str = "https://api.tavily.com/search";

/// Uses Tavily's search API for open-world source discovery.
#[derive(Clone)]
pub struct TavilySearcher {
    api_key: SecretString,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct Request<'a> {
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    url: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

impl Response {
    /// Candidates in provider order. Hits lacking a title or URL are dropped.
    fn into_candidates(self) -> Vec<CandidateSource> {
        self.results
            .into_iter()
            .filter_map(|r| CandidateSource::from_parts(r.title, r.url, r.content))
            .collect()
    }
}

impl TavilySearcher {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set a custom endpoint (for proxies or test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TextSearcher for TavilySearcher {
    async fn search(&self, query: &str, limit: usize) -> SearchResult<Vec<CandidateSource>> {
        let request = Request {
            query,
            search_depth: "basic",
            max_results: limit,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let parsed: Response = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        let candidates = parsed.into_candidates();
        debug!(query = %query, results = candidates.len(), "Tavily search");
        Ok(candidates)
    }
}

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use grant_harvester::ai::gemini::DEFAULT_MODEL;
use grant_harvester::backend::client::DEFAULT_BACKEND_URL;
use grant_harvester::{BackendClient, GeminiGenerator, SecretString, TavilySearcher, TextGenerator};

/// Harvester configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the AI tier is skipped
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: String,
    pub tavily_api_key: Option<SecretString>,
    pub backend_url: String,
    /// Absent means persistence is a no-op
    pub service_token: Option<SecretString>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            gemini_api_key: SecretString::non_empty(env::var("GEMINI_API_KEY").ok()),
            gemini_model: env::var("GEMINI_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tavily_api_key: SecretString::non_empty(env::var("TAVILY_API_KEY").ok()),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            service_token: SecretString::non_empty(env::var("SERVICE_TOKEN").ok()),
        })
    }

    /// Gemini generator, when a key is configured.
    pub fn generator(&self) -> Option<Arc<dyn TextGenerator>> {
        self.gemini_api_key.clone().map(|key| {
            Arc::new(GeminiGenerator::new(key).with_model(self.gemini_model.clone()))
                as Arc<dyn TextGenerator>
        })
    }

    pub fn searcher(&self) -> Result<TavilySearcher> {
        let key = self
            .tavily_api_key
            .clone()
            .context("TAVILY_API_KEY must be set for discovery")?;
        Ok(TavilySearcher::new(key))
    }

    pub fn backend(&self) -> BackendClient {
        BackendClient::new(self.backend_url.clone(), self.service_token.clone())
    }
}

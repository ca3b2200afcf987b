//! HTTP [`SourceSink`] for the grants backend.
//!
//! Sources are posted to `{base_url}/sources/service` with the service token
//! in `x-service-token`. Transient failures are retried with backoff; once the
//! budget is spent the source is reported as not persisted.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::PersistError;
use crate::resilience::{retry_with_backoff, RetryConfig};
use crate::security::SecretString;
use crate::traits::sink::SourceSink;
use crate::types::source::DiscoveredSource;

/// Backend URL used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

const SERVICE_TOKEN_HEADER: &str = "x-service-token";

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    token: Option<SecretString>,
    retry: RetryConfig,
    client: reqwest::Client,
}

impl BackendClient {
    /// A client for `base_url`. Without a token every persist is a no-op.
    pub fn new(base_url: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            retry: RetryConfig::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/sources/service", self.base_url)
    }

    async fn post(&self, token: &SecretString, source: &DiscoveredSource) -> Result<(), PersistError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(SERVICE_TOKEN_HEADER, token.expose())
            .json(source)
            .send()
            .await
            .map_err(|e| PersistError::Http(Box::new(e)))?;

        check_status(response.status().as_u16())
    }
}

/// Only 200 and 201 count as accepted.
fn check_status(status: u16) -> Result<(), PersistError> {
    match status {
        200 | 201 => Ok(()),
        other => Err(PersistError::Status(other)),
    }
}

#[async_trait]
impl SourceSink for BackendClient {
    async fn persist(&self, source: &DiscoveredSource) -> bool {
        let Some(token) = &self.token else {
            debug!(url = %source.base_url, "backend not configured, skipping persist");
            return false;
        };

        match retry_with_backoff(&self.retry, move || self.post(token, source)).await {
            Ok(()) => {
                info!(name = %source.name, url = %source.base_url, "source persisted");
                true
            }
            Err(e) => {
                warn!(url = %source.base_url, error = %e, "failed to persist source");
                false
            }
        }
    }
}

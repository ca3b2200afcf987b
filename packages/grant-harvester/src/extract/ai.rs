//! Model-backed grant extraction.
//!
//! One call per extraction, bounded by a hard deadline. There is no retry
//! loop here: a timeout or a bad answer is handed back to the orchestrator,
//! which falls back to the heuristic tier.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::patterns::parse_whole_amount;
use super::prompts::{format_extract_prompt, strip_code_fence};
use crate::error::{AiError, AiResult};
use crate::traits::generator::TextGenerator;
use crate::types::config::ExtractionConfig;
use crate::types::grant::{ExtractionMethod, GrantRecord};

/// JSON shape requested from the model.
#[derive(Debug, Deserialize)]
struct AiGrantResponse {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    deadline: Value,
}

/// Extractor that delegates to a [`TextGenerator`].
#[derive(Clone)]
pub struct AiExtractor {
    generator: Arc<dyn TextGenerator>,
    config: ExtractionConfig,
}

impl AiExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Ask the model for a grant record.
    ///
    /// Fails with [`AiError::Timeout`] when the deadline expires (the
    /// in-flight call is dropped) and with [`AiError::InvalidResponse`] when
    /// the answer is not a valid record.
    pub async fn extract(&self, html: &str, url: &str, source: &str) -> AiResult<GrantRecord> {
        let prompt = format_extract_prompt(html, self.config.max_prompt_chars);
        let deadline = self.config.ai_timeout;

        debug!(
            generator = self.generator.name(),
            prompt_chars = prompt.len(),
            "requesting AI extraction"
        );

        let response = tokio::time::timeout(deadline, self.generator.generate(&prompt))
            .await
            .map_err(|_| AiError::Timeout(deadline))??;

        parse_grant_response(&response, url, source)
    }
}

/// Turn a model answer into a validated record.
pub fn parse_grant_response(response: &str, url: &str, source: &str) -> AiResult<GrantRecord> {
    let parsed: AiGrantResponse = serde_json::from_str(strip_code_fence(response))
        .map_err(|e| AiError::InvalidResponse(format!("not a grant JSON object: {}", e)))?;

    let title = required_text("title", parsed.title)?;
    let description = required_text("description", parsed.description)?;
    let amount = parse_amount(&parsed.amount)?;
    let deadline = parse_deadline(&parsed.deadline)?;

    GrantRecord::new(
        title,
        description,
        amount,
        deadline,
        url,
        source,
        ExtractionMethod::Ai,
    )
    .map_err(|e| AiError::InvalidResponse(e.to_string()))
}

fn required_text(field: &str, value: Option<String>) -> AiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AiError::InvalidResponse(format!("missing {}", field)))
}

fn parse_amount(value: &Value) -> AiResult<Option<u64>> {
    let invalid = || AiError::InvalidResponse(format!("amount is not a non-negative integer: {}", value));

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return Ok(Some(whole));
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                    Ok(Some(f as u64))
                }
                _ => Err(invalid()),
            }
        }
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_whole_amount(s.trim()).map(Some).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

fn parse_deadline(value: &Value) -> AiResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        other => Err(AiError::InvalidResponse(format!(
            "deadline is not a string: {}",
            other
        ))),
    }
}

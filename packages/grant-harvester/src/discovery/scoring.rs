//! Candidate confidence scoring.
//!
//! Heuristic scoring is always available. AI validation follows the same
//! discipline as AI extraction: one bounded call, and any failure falls back
//! to the heuristic score.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AiError, AiResult};
use crate::extract::prompts::{format_validate_prompt, strip_code_fence};
use crate::traits::generator::TextGenerator;
use crate::types::source::{CandidateSource, ValidationHints};

/// Title substrings that suggest a grant or subsidy page.
pub const GRANT_KEYWORDS: &[&str] = &["subv", "ayuda", "grant"];

const BASE_CONFIDENCE: f64 = 0.4;
const KEYWORD_BONUS: f64 = 0.2;
const SCOPE_BONUS: f64 = 0.1;
const MAX_HEURISTIC_CONFIDENCE: f64 = 0.95;

/// Confidence assumed when the model omits it.
const DEFAULT_AI_CONFIDENCE: f64 = 0.6;
const AI_CONFIDENCE_RANGE: (f64, f64) = (0.1, 0.99);

/// Keyword-based legitimacy estimate.
pub fn heuristic_confidence(candidate: &CandidateSource, scope: &str) -> f64 {
    let title = candidate.title.to_lowercase();
    let scope = scope.trim().to_lowercase();

    let mut confidence = BASE_CONFIDENCE;
    if GRANT_KEYWORDS.iter().any(|k| title.contains(k)) {
        confidence += KEYWORD_BONUS;
    }
    if !scope.is_empty() && title.contains(&scope) {
        confidence += SCOPE_BONUS;
    }
    confidence.min(MAX_HEURISTIC_CONFIDENCE)
}

/// Parse `{confidence, description, organization, region}` from a model answer.
pub fn parse_validation_response(response: &str) -> AiResult<(f64, ValidationHints)> {
    let value: Value = serde_json::from_str(strip_code_fence(response))
        .map_err(|e| AiError::InvalidResponse(format!("not JSON: {}", e)))?;

    let object = value
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or_else(|| AiError::InvalidResponse("expected a non-empty JSON object".into()))?;

    let confidence = match object.get("confidence") {
        None | Some(Value::Null) => DEFAULT_AI_CONFIDENCE,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(DEFAULT_AI_CONFIDENCE),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            AiError::InvalidResponse(format!("confidence is not numeric: {}", s))
        })?,
        Some(other) => {
            return Err(AiError::InvalidResponse(format!(
                "confidence is not numeric: {}",
                other
            )))
        }
    };
    if !confidence.is_finite() {
        return Err(AiError::InvalidResponse("confidence is not finite".into()));
    }

    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let hints = ValidationHints {
        description: text("description"),
        region: text("region"),
        organization: text("organization"),
    };

    Ok((
        confidence.clamp(AI_CONFIDENCE_RANGE.0, AI_CONFIDENCE_RANGE.1),
        hints,
    ))
}

/// Model-assisted candidate validation with heuristic fallback.
#[derive(Clone)]
pub struct CandidateValidator {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl CandidateValidator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Score a candidate. Never fails: any AI problem yields the heuristic score.
    pub async fn validate(&self, candidate: &CandidateSource, scope: &str) -> (f64, ValidationHints) {
        match self.ask(candidate, scope).await {
            Ok(scored) => {
                debug!(url = %candidate.raw_url, confidence = scored.0, "AI validation succeeded");
                scored
            }
            Err(e) => {
                warn!(
                    url = %candidate.raw_url,
                    error = %e,
                    "AI validation failed, using heuristic confidence"
                );
                (heuristic_confidence(candidate, scope), ValidationHints::default())
            }
        }
    }

    async fn ask(&self, candidate: &CandidateSource, scope: &str) -> AiResult<(f64, ValidationHints)> {
        let prompt = format_validate_prompt(candidate, scope);
        let response = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))??;
        parse_validation_response(&response)
    }
}

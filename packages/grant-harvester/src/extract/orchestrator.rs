//! Two-tier extraction with an explicit fallback state machine.
//!
//! ```text
//! START ──(AI configured)──▶ TRY_AI ──(ok)──▶ SUCCESS
//!   │                          │
//!   │                      (any error)
//!   ▼                          ▼
//!   └────────────────────▶ TRY_HEURISTIC ──(ok)──▶ SUCCESS
//!                              │
//!                          (rejected)──▶ FAIL(reason)
//! ```
//!
//! Each request drives its own state value; the orchestrator holds no
//! per-request mutable state and can be shared across tasks.

use tracing::{debug, error, info, warn};

use super::ai::AiExtractor;
use super::heuristic::HeuristicExtractor;
use crate::types::grant::{ExtractionOutcome, GrantRecord};

/// Input of one extraction request.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub html: &'a str,
    pub url: &'a str,
    pub source: &'a str,
}

impl<'a> ExtractionRequest<'a> {
    pub fn new(html: &'a str, url: &'a str, source: &'a str) -> Self {
        Self { html, url, source }
    }
}

/// Position in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionState {
    Start,
    TryAi,
    /// `ai_attempted` records whether the AI tier ran before this one.
    TryHeuristic { ai_attempted: bool },
    Success(GrantRecord),
    Fail(String),
}

impl ExtractionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Fail(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::TryAi => "try_ai",
            Self::TryHeuristic { .. } => "try_heuristic",
            Self::Success(_) => "success",
            Self::Fail(_) => "fail",
        }
    }
}

/// Sequences the AI tier and the heuristic tier.
#[derive(Clone, Default)]
pub struct ExtractionOrchestrator {
    ai: Option<AiExtractor>,
    heuristic: HeuristicExtractor,
}

impl ExtractionOrchestrator {
    /// Orchestrator with the heuristic tier only.
    pub fn heuristic_only() -> Self {
        Self::default()
    }

    /// Orchestrator that tries `ai` first.
    pub fn with_ai(ai: AiExtractor) -> Self {
        Self {
            ai: Some(ai),
            heuristic: HeuristicExtractor::new(),
        }
    }

    /// Orchestrator with an optional AI tier; `None` skips it silently.
    pub fn new(ai: Option<AiExtractor>) -> Self {
        Self {
            ai,
            heuristic: HeuristicExtractor::new(),
        }
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Extract a grant record, or explain why none could be produced.
    pub async fn extract(&self, html: &str, url: &str, source: &str) -> ExtractionOutcome {
        let request = ExtractionRequest::new(html, url, source);
        info!(source = %source, url = %url, "starting grant extraction");

        let mut state = ExtractionState::Start;
        loop {
            state = match state {
                ExtractionState::Success(record) => return ExtractionOutcome::success(record),
                ExtractionState::Fail(reason) => return ExtractionOutcome::failure(reason),
                pending => {
                    let from = pending.label();
                    let next = self.advance(pending, &request).await;
                    debug!(source = %source, from, to = next.label(), "extraction transition");
                    next
                }
            };
        }
    }

    /// Perform one transition. Terminal states are returned unchanged.
    pub async fn advance(
        &self,
        state: ExtractionState,
        request: &ExtractionRequest<'_>,
    ) -> ExtractionState {
        match state {
            ExtractionState::Start => {
                if self.ai.is_some() {
                    ExtractionState::TryAi
                } else {
                    ExtractionState::TryHeuristic {
                        ai_attempted: false,
                    }
                }
            }

            ExtractionState::TryAi => {
                let Some(ai) = &self.ai else {
                    return ExtractionState::TryHeuristic {
                        ai_attempted: false,
                    };
                };

                match ai.extract(request.html, request.url, request.source).await {
                    Ok(record) => {
                        info!(source = %request.source, "AI extraction succeeded");
                        ExtractionState::Success(record)
                    }
                    Err(e) => {
                        warn!(
                            source = %request.source,
                            error = %e,
                            "AI extraction failed, falling back to heuristic"
                        );
                        ExtractionState::TryHeuristic { ai_attempted: true }
                    }
                }
            }

            ExtractionState::TryHeuristic { ai_attempted } => {
                match self
                    .heuristic
                    .extract(request.html, request.url, request.source)
                {
                    Ok(record) => {
                        info!(source = %request.source, "heuristic extraction succeeded");
                        ExtractionState::Success(record)
                    }
                    Err(e) => {
                        let reason = failure_reason(request.source, ai_attempted);
                        error!(
                            source = %request.source,
                            error = %e,
                            "all extraction methods failed"
                        );
                        ExtractionState::Fail(reason)
                    }
                }
            }

            terminal => terminal,
        }
    }
}

fn failure_reason(source: &str, ai_attempted: bool) -> String {
    if ai_attempted {
        format!(
            "Failed to extract grant data from {}. Both AI and heuristic extraction failed.",
            source
        )
    } else {
        format!(
            "Failed to extract grant data from {}. Heuristic extraction failed and no AI model is configured.",
            source
        )
    }
}

//! Grant extraction: heuristic rules, model-backed extraction, and the
//! orchestrator that chains them.

pub mod ai;
pub mod heuristic;
pub mod orchestrator;
pub mod patterns;
pub mod prompts;

pub use ai::{parse_grant_response, AiExtractor};
pub use heuristic::HeuristicExtractor;
pub use orchestrator::{ExtractionOrchestrator, ExtractionRequest, ExtractionState};

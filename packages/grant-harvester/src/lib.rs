//! Grant Harvester
//!
//! Turns untrusted, heterogeneous web content into validated grant records
//! and discovers candidate funding sources from web search.
//!
//! # Design
//!
//! - Extraction is two-tier: a model-backed extractor under a hard deadline,
//!   then a deterministic heuristic extractor. A request always ends in a
//!   record or an explicit failure naming the source.
//! - Remote calls that are worth repeating go through bounded exponential
//!   backoff with jitter.
//! - Discovery canonicalizes and deduplicates URLs, scores candidates and
//!   stops at a result budget. Failed queries are skipped, never fatal.
//! - Model, search and persistence are capability traits, so every
//!   orchestration path runs against mocks in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use grant_harvester::{AiExtractor, ExtractionOrchestrator, GeminiGenerator};
//!
//! let generator = Arc::new(GeminiGenerator::new(api_key));
//! let orchestrator = ExtractionOrchestrator::with_ai(AiExtractor::new(generator));
//!
//! let outcome = orchestrator.extract(&html, "https://sede.gob.es/ayudas", "BOE").await;
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Heuristic and AI extraction plus the fallback orchestrator
//! - [`discovery`] - Query generation, search, dedup and scoring
//! - [`resilience`] - Backoff policy and retry executor
//! - [`traits`] - Capability interfaces (TextGenerator, TextSearcher, SourceSink)
//! - [`types`] - Records, sources and configuration
//! - [`ai`], [`search`], [`backend`] - HTTP providers
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod backend;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod resilience;
pub mod search;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AiError, PersistError, Retryable, SearchError, ValidationError};
pub use traits::{
    generator::TextGenerator,
    searcher::TextSearcher,
    sink::{persist_all, SourceSink},
};
pub use types::{
    config::{DiscoveryConfig, ExtractionConfig},
    grant::{ExtractionMethod, ExtractionOutcome, GrantRecord},
    source::{CandidateSource, DiscoveredSource, SourceMetadata, SourceType, ValidationHints},
};

// Re-export pipelines
pub use discovery::{DiscoveryOrchestrator, DiscoveryRequest, DiscoveryScope};
pub use extract::{AiExtractor, ExtractionOrchestrator, HeuristicExtractor};
pub use resilience::{retry_blocking, retry_with_backoff, RetryConfig};

// Re-export providers
pub use ai::GeminiGenerator;
pub use backend::BackendClient;
pub use search::TavilySearcher;
pub use security::SecretString;

// Re-export testing utilities
pub use testing::{MockGenerator, MockSearcher, MockSink};

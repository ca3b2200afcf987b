//! Funding-source discovery: query generation, search, dedup and scoring.

pub mod canonical;
pub mod orchestrator;
pub mod queries;
pub mod scoring;
pub mod search;

pub use canonical::{canonicalize_url, is_official_domain};
pub use orchestrator::{DiscoveryOrchestrator, DiscoveryRequest};
pub use queries::{build_queries, DiscoveryScope};
pub use scoring::{heuristic_confidence, parse_validation_response, CandidateValidator};
pub use search::CandidateSearch;

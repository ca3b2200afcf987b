//! Capability interfaces consumed by the harvester.
//!
//! Applications implement these to plug in a model, a search provider and a
//! persistence backend.

pub mod generator;
pub mod searcher;
pub mod sink;

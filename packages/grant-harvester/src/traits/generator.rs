//! Text-generation capability.
//!
//! The harvester never talks to a model directly. It hands a prompt to a
//! `TextGenerator` and interprets the text that comes back, so providers can
//! be swapped or mocked without touching orchestration.

use async_trait::async_trait;

use crate::error::AiResult;

/// Opaque "generate text from prompt" capability.
///
/// Callers bound each call with their own deadline (`tokio::time::timeout`),
/// so implementations may take as long as the provider does. Transport
/// problems should surface as [`AiError::Request`](crate::error::AiError::Request)
/// or [`AiError::Status`](crate::error::AiError::Status) so they can be
/// classified as transient.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> AiResult<String>;

    /// Provider/model label used in logs.
    fn name(&self) -> &str {
        "text-generator"
    }
}

//! Destination for confirmed sources.

use async_trait::async_trait;

use crate::types::source::DiscoveredSource;

/// Opaque "persist source" capability.
///
/// Never fails loudly: an unconfigured or unreachable backend yields `false`.
#[async_trait]
pub trait SourceSink: Send + Sync {
    async fn persist(&self, source: &DiscoveredSource) -> bool;
}

/// Persist every source in order and return how many were accepted.
pub async fn persist_all<S>(sink: &S, sources: &[DiscoveredSource]) -> usize
where
    S: SourceSink + ?Sized,
{
    let mut saved = 0;
    for source in sources {
        if sink.persist(source).await {
            saved += 1;
        }
    }
    tracing::info!(saved, total = sources.len(), "persisted discovered sources");
    saved
}

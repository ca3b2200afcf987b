//! Search candidates and the funding sources discovered from them.

use serde::{Deserialize, Serialize};

/// Maximum length of a discovered source name, in characters.
pub const MAX_SOURCE_NAME_CHARS: usize = 200;

/// Label stored in `metadata.discoveredBy`.
pub const DISCOVERED_BY: &str = "IA Discovery Engine";

/// A raw hit from one search call.
///
/// Short-lived: it is canonicalized and then either dropped or turned into a
/// [`DiscoveredSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSource {
    pub title: String,
    pub raw_url: String,
    pub snippet: String,
}

impl CandidateSource {
    pub fn new(
        title: impl Into<String>,
        raw_url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            raw_url: raw_url.into(),
            snippet: snippet.into(),
        }
    }

    /// Build a candidate from provider fields, requiring both a title and a URL.
    pub fn from_parts(
        title: Option<String>,
        url: Option<String>,
        snippet: Option<String>,
    ) -> Option<Self> {
        let title = title.filter(|t| !t.trim().is_empty())?;
        let url = url.filter(|u| !u.trim().is_empty())?;
        Some(Self::new(title, url, snippet.unwrap_or_default()))
    }
}

/// How a source is fetched once activated. Serialized as `HTML`, `RSS` and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceType {
    #[default]
    Html,
    Rss,
    Api,
    Pdf,
}

/// Descriptive fields attached to a discovered source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub discovered_by: String,
    /// Legitimacy estimate in `[0, 1]`.
    pub confidence: f64,
    pub description: String,
    pub region: String,
    pub organization: String,
}

/// A candidate that survived dedup, filtering and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSource {
    pub name: String,
    /// Canonical URL; unique within one discovery run.
    pub base_url: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Always false at discovery time. Activation happens elsewhere.
    pub is_active: bool,
    pub metadata: SourceMetadata,
}

/// Metadata suggested by a validator. Missing values fall back to candidate data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationHints {
    pub description: Option<String>,
    pub region: Option<String>,
    pub organization: Option<String>,
}

impl DiscoveredSource {
    /// Assemble a source from a candidate, its canonical URL and its score.
    pub fn from_candidate(
        candidate: &CandidateSource,
        base_url: impl Into<String>,
        confidence: f64,
        hints: ValidationHints,
    ) -> Self {
        let name: String = candidate
            .title
            .trim()
            .chars()
            .take(MAX_SOURCE_NAME_CHARS)
            .collect();

        let metadata = SourceMetadata {
            discovered_by: DISCOVERED_BY.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            description: hints
                .description
                .unwrap_or_else(|| candidate.snippet.clone()),
            region: hints.region.unwrap_or_else(|| "N/A".to_string()),
            organization: hints.organization.unwrap_or_else(|| name.clone()),
        };

        Self {
            name,
            base_url: base_url.into(),
            source_type: SourceType::Html,
            is_active: false,
            metadata,
        }
    }
}

//! Search query generation.
//!
//! Query sets are pure functions of (scope, regions) and their order is
//! the order in which discovery runs them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Queries issued for every scope, first.
pub const BASE_QUERIES: &[&str] = &[
    "subvenciones site:gov",
    "ayudas publicas site:gov",
    "convocatorias subvenciones site:gov",
];

/// Geographic scope of a discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryScope {
    Espana,
    #[default]
    Europa,
    Internacional,
}

impl DiscoveryScope {
    /// Map a free-form label to a scope. Unknown labels fall back to
    /// [`DiscoveryScope::Europa`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "espana" | "españa" => Self::Espana,
            "internacional" | "international" => Self::Internacional,
            _ => Self::Europa,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Espana => "espana",
            Self::Europa => "europa",
            Self::Internacional => "internacional",
        }
    }

    /// Scope-specific queries, run after [`BASE_QUERIES`].
    fn scoped_queries(&self) -> &'static [&'static str] {
        match self {
            Self::Espana => &["subvenciones espana", "ayudas espana site:*.gob.es"],
            Self::Internacional => &["grants site:gov", "public funding site:gov"],
            Self::Europa => &[
                "subvenciones europa site:europa.eu",
                "eu funding site:europa.eu",
            ],
        }
    }

    /// One extra query per region refinement.
    fn region_query(&self, region: &str) -> String {
        match self {
            Self::Espana => format!("subvenciones {} site:*.gob.es", region),
            Self::Internacional => format!("grants {} site:gov", region),
            Self::Europa => format!("subvenciones {} site:europa.eu", region),
        }
    }
}

impl FromStr for DiscoveryScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for DiscoveryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base queries, then scope variants, then one query per non-blank region.
pub fn build_queries(scope: DiscoveryScope, regions: &[String]) -> Vec<String> {
    BASE_QUERIES
        .iter()
        .chain(scope.scoped_queries())
        .map(|q| q.to_string())
        .chain(
            regions
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(|r| scope.region_query(r)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_espana_with_region() {
        let queries = build_queries(DiscoveryScope::Espana, &["Madrid".to_string()]);
        assert_eq!(
            queries,
            vec![
                "subvenciones site:gov",
                "ayudas publicas site:gov",
                "convocatorias subvenciones site:gov",
                "subvenciones espana",
                "ayudas espana site:*.gob.es",
                "subvenciones Madrid site:*.gob.es",
            ]
        );
    }

    #[test]
    fn test_each_region_adds_one_query() {
        let none = build_queries(DiscoveryScope::Europa, &[]);
        let two = build_queries(
            DiscoveryScope::Europa,
            &["Bavaria".to_string(), "Lombardia".to_string()],
        );
        assert_eq!(two.len(), none.len() + 2);
        assert_eq!(two.last().unwrap(), "subvenciones Lombardia site:europa.eu");
    }

    #[test]
    fn test_blank_regions_ignored() {
        let queries = build_queries(DiscoveryScope::Internacional, &["  ".to_string()]);
        assert_eq!(queries.len(), BASE_QUERIES.len() + 2);
    }

    #[test]
    fn test_pure_function() {
        let regions = vec!["Sevilla".to_string()];
        assert_eq!(
            build_queries(DiscoveryScope::Espana, &regions),
            build_queries(DiscoveryScope::Espana, &regions)
        );
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("espana".parse::<DiscoveryScope>().unwrap(), DiscoveryScope::Espana);
        assert_eq!("INTERNACIONAL".parse::<DiscoveryScope>().unwrap(), DiscoveryScope::Internacional);
        assert_eq!("anything".parse::<DiscoveryScope>().unwrap(), DiscoveryScope::Europa);
    }
}

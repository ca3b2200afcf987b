//! Grant records and extraction outcomes.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed title length, in characters.
pub const TITLE_LEN: (usize, usize) = (5, 500);

/// Allowed description length, in characters.
pub const DESCRIPTION_LEN: (usize, usize) = (10, 5000);

/// Which tier produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Text-generation model
    Ai,
    /// Deterministic HTML rules
    Heuristic,
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMethod::Ai => f.write_str("ai"),
            ExtractionMethod::Heuristic => f.write_str("heuristic"),
        }
    }
}

/// A validated grant announcement.
///
/// Fields are private so a record can only exist once [`GrantRecord::new`]
/// has checked the title and description bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRecord {
    title: String,
    description: String,
    /// Minor currency units.
    amount: Option<u64>,
    /// `YYYY-MM-DD`; calendar correctness is not checked.
    deadline: Option<String>,
    url: String,
    source: String,
    extraction_method: ExtractionMethod,
}

impl GrantRecord {
    /// Build a record, rejecting titles or descriptions outside their bounds.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Option<u64>,
        deadline: Option<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        extraction_method: ExtractionMethod,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let description = description.into();
        check_length("title", &title, TITLE_LEN)?;
        check_length("description", &description, DESCRIPTION_LEN)?;

        Ok(Self {
            title,
            description,
            amount,
            deadline,
            url: url.into(),
            source: source.into(),
            extraction_method,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Option<u64> {
        self.amount
    }

    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn extraction_method(&self) -> ExtractionMethod {
        self.extraction_method
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// Result of one extraction request.
///
/// There is no empty variant: a missing record always comes with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionOutcome {
    Success {
        record: GrantRecord,
        method: ExtractionMethod,
    },
    Failure {
        reason: String,
    },
}

impl ExtractionOutcome {
    pub(crate) fn success(record: GrantRecord) -> Self {
        let method = record.extraction_method();
        Self::Success { record, method }
    }

    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            "grant extraction failed".to_string()
        } else {
            reason
        };
        Self::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn record(&self) -> Option<&GrantRecord> {
        match self {
            Self::Success { record, .. } => Some(record),
            Self::Failure { .. } => None,
        }
    }

    pub fn method(&self) -> Option<ExtractionMethod> {
        match self {
            Self::Success { method, .. } => Some(*method),
            Self::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    pub fn into_record(self) -> Option<GrantRecord> {
        match self {
            Self::Success { record, .. } => Some(record),
            Self::Failure { .. } => None,
        }
    }
}

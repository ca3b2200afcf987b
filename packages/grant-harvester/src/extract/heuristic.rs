//! Rule-based HTML → grant extraction.
//!
//! Always available and deterministic: the same HTML yields the same result.
//! Malformed markup is tolerated by the HTML5 parser; a page that is too
//! sparse is reported as a [`ValidationError`], never as a panic.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::patterns::{find_amount, find_deadline};
use crate::error::ValidationError;
use crate::types::grant::{ExtractionMethod, GrantRecord};

/// Paragraphs must be longer than this (in characters) to serve as description.
const MIN_PARAGRAPH_CHARS: usize = 50;

/// Description length cap, in characters.
const MAX_DESCRIPTION_CHARS: usize = 500;

static SEL_NON_VISIBLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script, style").unwrap());
static SEL_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Title sources in priority order.
static TITLE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["h1", "h2", "title"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Deterministic fallback extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a grant from `html`.
    ///
    /// Returns the validation error when the assembled title or description
    /// does not meet the record bounds.
    pub fn extract(
        &self,
        html: &str,
        url: &str,
        source: &str,
    ) -> Result<GrantRecord, ValidationError> {
        let document = parse_visible(html);
        let full_text = document.root_element().text().collect::<Vec<_>>().join(" ");

        let title = find_title(&document).unwrap_or_else(|| format!("Grant from {}", source));
        let description = find_description(&document).unwrap_or_else(|| {
            truncate_chars(&normalize_whitespace(&full_text), MAX_DESCRIPTION_CHARS)
        });
        let amount = find_amount(&full_text);
        let deadline = find_deadline(&full_text);

        debug!(
            source = %source,
            title = %title,
            description_chars = description.chars().count(),
            amount = ?amount,
            deadline = ?deadline,
            "heuristic fields assembled"
        );

        GrantRecord::new(
            title,
            description,
            amount,
            deadline,
            url,
            source,
            ExtractionMethod::Heuristic,
        )
    }
}

/// Parse and drop `<script>`/`<style>` subtrees before any text is read.
fn parse_visible(html: &str) -> Html {
    let mut document = Html::parse_document(html);
    let hidden: Vec<_> = document.select(&SEL_NON_VISIBLE).map(|el| el.id()).collect();
    for id in hidden {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    document
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn find_title(document: &Html) -> Option<String> {
    TITLE_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

fn find_description(document: &Html) -> Option<String> {
    document
        .select(&SEL_PARAGRAPH)
        .map(element_text)
        .find(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

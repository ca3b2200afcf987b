//! Regex tables used by the heuristic extractor.
//!
//! Patterns are data: each table is scanned in declaration order and the
//! first pattern that yields a parsable value wins.

use std::sync::LazyLock;

use regex::Regex;

static RE_CURRENCY_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[€$]\s*([0-9]{1,3}(?:[,.][0-9]{3})+)").unwrap());
static RE_EUR_SUFFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]{1,3}(?:[,.][0-9]{3})+)\s*EUR").unwrap());
static RE_AMOUNT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)amount[:\s]+[€$]?\s*([0-9]+(?:[,.][0-9]{3})+)").unwrap());
static RE_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap());
static RE_WHOLE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+|[0-9]{1,3}(?:[,.][0-9]{3})+)$").unwrap());

/// A named pattern whose first capture group holds a grouped number.
pub struct AmountPattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Regex>,
}

/// Amount patterns in priority order.
pub static AMOUNT_PATTERNS: &[AmountPattern] = &[
    AmountPattern {
        name: "currency_prefixed",
        regex: &RE_CURRENCY_PREFIXED,
    },
    AmountPattern {
        name: "eur_suffixed",
        regex: &RE_EUR_SUFFIXED,
    },
    AmountPattern {
        name: "amount_keyword",
        regex: &RE_AMOUNT_KEYWORD,
    },
];

/// Deadline patterns in priority order.
pub static DEADLINE_PATTERNS: &[&LazyLock<Regex>] = &[&RE_ISO_DATE];

/// Strip `,` and `.` grouping separators and parse.
pub fn parse_grouped_number(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| *c != ',' && *c != '.').collect();
    digits.parse().ok()
}

/// Parse a standalone amount string: plain digits or grouped thousands.
///
/// Decimal forms such as `12500.50` or `1.5` are rejected rather than
/// having their separators stripped.
pub fn parse_whole_amount(raw: &str) -> Option<u64> {
    if !RE_WHOLE_AMOUNT.is_match(raw) {
        return None;
    }
    parse_grouped_number(raw)
}

/// First amount found by [`AMOUNT_PATTERNS`].
pub fn find_amount(text: &str) -> Option<u64> {
    AMOUNT_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.regex.captures(text)?.get(1)?;
        parse_grouped_number(captured.as_str())
    })
}

/// First `YYYY-MM-DD` substring in `text`.
pub fn find_deadline(text: &str) -> Option<String> {
    DEADLINE_PATTERNS.iter().find_map(|regex| {
        regex
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

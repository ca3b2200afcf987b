//! LLM prompts for grant extraction and source validation.

use crate::types::source::CandidateSource;

/// Prompt for extracting one grant from raw HTML.
pub const EXTRACT_GRANT_PROMPT: &str = r#"Extract grant information from the following HTML. Return JSON with:
- title: Grant name/title
- description: Grant description
- amount: Grant amount in EUR (number only, or null)
- deadline: Application deadline (ISO 8601 date or null)

HTML:
{html}

Return ONLY valid JSON, no markdown, no extra text."#;

/// Instruction header for classifying a search hit as an official grant portal.
pub const VALIDATE_SOURCE_PROMPT: &str = "Classify if this URL is an official grant/subsidy portal. \
Return JSON with keys: confidence (0-1), description, organization, region.";

/// Format the extraction prompt with the first `max_chars` characters of `html`.
pub fn format_extract_prompt(html: &str, max_chars: usize) -> String {
    let prefix: String = html.chars().take(max_chars).collect();
    EXTRACT_GRANT_PROMPT.replace("{html}", &prefix)
}

/// Format the validation prompt for one candidate.
pub fn format_validate_prompt(candidate: &CandidateSource, scope: &str) -> String {
    format!(
        "{VALIDATE_SOURCE_PROMPT}\n\nTitle: {}\nURL: {}\nSnippet: {}\nScope: {}\n\nJSON only.",
        candidate.title, candidate.raw_url, candidate.snippet, scope
    )
}

/// Strip a Markdown code fence that models like to wrap JSON in.
///
/// The `json` language tag is matched case-insensitively.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed.trim_end_matches("```").trim();
    };
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    body.trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prompt_truncates_html() {
        let html = "é".repeat(6_000);
        let prompt = format_extract_prompt(&html, 5_000);
        assert_eq!(prompt.matches('é').count(), 5_000);
        assert!(prompt.starts_with("Extract grant information"));
        assert!(prompt.ends_with("no extra text."));
    }

    #[test]
    fn test_validate_prompt_embeds_candidate() {
        let candidate = CandidateSource::new("Ayudas", "https://sede.gob.es", "Portal oficial");
        let prompt = format_validate_prompt(&candidate, "espana");
        assert!(prompt.contains("Title: Ayudas"));
        assert!(prompt.contains("URL: https://sede.gob.es"));
        assert!(prompt.contains("Scope: espana"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_code_fence_tag_case() {
        assert_eq!(strip_code_fence("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```Json {\"a\":1}```"), "{\"a\":1}");
    }
}

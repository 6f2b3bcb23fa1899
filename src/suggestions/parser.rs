//! Turning free-form completions into suggestions

use crate::suggestions::prompts::truncate_chars;
use crate::suggestions::{Refinement, Suggestion, SuggestionOutcome};
use log::{debug, warn};

const FALLBACK_JUSTIFICATION: &str = "Model-generated recommendation";
const FALLBACK_PREVIEW_CHARS: usize = 200;

/// Parse a completion that was asked for a JSON array of suggestions.
///
/// The outermost `[...]` slice is tried first. If it is missing or does not
/// deserialize, the numbered or bulleted lines of the text become suggestions,
/// and failing that the first 200 characters do.
pub fn parse_suggestions(text: &str) -> SuggestionOutcome {
    if let Some(json) = outer_slice(text, '[', ']') {
        match serde_json::from_str::<Vec<Suggestion>>(json) {
            Ok(suggestions) => {
                debug!("Parsed {} structured suggestions", suggestions.len());
                return SuggestionOutcome::Structured { suggestions };
            }
            Err(e) => warn!("Completion contained malformed JSON suggestions: {}", e),
        }
    } else {
        warn!("Completion contained no JSON array, parsing as text");
    }

    SuggestionOutcome::FallbackText {
        raw_text: text.to_string(),
        suggestions: parse_text_suggestions(text),
    }
}

fn parse_text_suggestions(text: &str) -> Vec<Suggestion> {
    let suggestions: Vec<Suggestion> = text
        .lines()
        .map(str::trim)
        .filter(|line| is_list_line(line))
        .map(|line| line.trim_start_matches(|c: char| matches!(c, '1' | '2' | '3' | '.' | '-' | '•' | ' ')))
        .filter(|line| !line.is_empty())
        .map(fallback_suggestion)
        .collect();

    if suggestions.is_empty() {
        vec![fallback_suggestion(truncate_chars(text, FALLBACK_PREVIEW_CHARS))]
    } else {
        suggestions
    }
}

fn is_list_line(line: &str) -> bool {
    ["1.", "2.", "3.", "-", "•"]
        .iter()
        .any(|marker| line.starts_with(marker))
}

fn fallback_suggestion(text: &str) -> Suggestion {
    Suggestion {
        section: Suggestion::GENERAL_SECTION.to_string(),
        suggestion: text.to_string(),
        justification: FALLBACK_JUSTIFICATION.to_string(),
    }
}

/// Parse a completion that was asked for a `{summary, experience}` object
pub fn parse_refinement(text: &str) -> Option<Refinement> {
    let json = outer_slice(text, '{', '}')?;
    match serde_json::from_str::<Refinement>(json) {
        Ok(refinement) => Some(refinement),
        Err(e) => {
            warn!("Completion contained a malformed refinement: {}", e);
            None
        }
    }
}

/// From the first `open` to the last `close`, inclusive
fn outer_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_suggestions() {
        let text = r#"Here you go:
[
  {"section": "Skills", "suggestion": "Add Kubernetes", "justification": "Listed as required"},
  {"suggestion": "Quantify API latency improvements"}
]
Good luck!"#;

        match parse_suggestions(text) {
            SuggestionOutcome::Structured { suggestions } => {
                assert_eq!(suggestions.len(), 2);
                assert_eq!(suggestions[0].section, "Skills");
                assert_eq!(suggestions[1].section, "General");
                assert_eq!(suggestions[1].justification, "");
            }
            other => panic!("expected structured suggestions, got {:?}", other),
        }
    }

    #[test]
    fn test_numbered_text_fallback() {
        let text = "Some thoughts:\n1. Add Kubernetes to skills\n2. Mention CI pipelines\n- Shorten the summary\nThanks";

        match parse_suggestions(text) {
            SuggestionOutcome::FallbackText { raw_text, suggestions } => {
                assert_eq!(raw_text, text);
                let texts: Vec<&str> = suggestions.iter().map(|s| s.suggestion.as_str()).collect();
                assert_eq!(
                    texts,
                    vec!["Add Kubernetes to skills", "Mention CI pipelines", "Shorten the summary"]
                );
                assert!(suggestions.iter().all(|s| s.section == "General"));
            }
            other => panic!("expected text fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let text = "[not json]\n• Highlight leadership";
        let outcome = parse_suggestions(text);

        assert!(matches!(outcome, SuggestionOutcome::FallbackText { .. }));
        assert_eq!(outcome.suggestions()[0].suggestion, "Highlight leadership");
    }

    #[test]
    fn test_plain_text_uses_preview() {
        let text = "x".repeat(500);
        let outcome = parse_suggestions(&text);

        assert_eq!(outcome.suggestions().len(), 1);
        assert_eq!(outcome.suggestions()[0].suggestion.chars().count(), 200);
    }

    #[test]
    fn test_refinement_object() {
        let text = "```json\n{\"summary\": \"Backend engineer\", \"experience\": \"- Built APIs\"}\n```";
        let refinement = parse_refinement(text).unwrap();

        assert_eq!(refinement.summary, "Backend engineer");
        assert_eq!(refinement.experience, "- Built APIs");
    }

    #[test]
    fn test_refinement_missing_or_malformed() {
        assert!(parse_refinement("no object here").is_none());
        assert!(parse_refinement("{\"summary\": 3}").is_none());
        assert!(parse_refinement("} backwards {").is_none());
    }
}

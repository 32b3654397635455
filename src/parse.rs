//! Extraction of the analysis JSON from free-form model output.
//!
//! Models often wrap the object in a markdown fence or surround it with
//! prose, so the text is scanned for balanced `{...}` objects rather than
//! parsed directly.

use crate::models::AnalysisResult;
use crate::{Error, Result};
use serde_json::Value;

/// Top-level balanced `{...}` substrings of `text`, in order of appearance.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// affect nesting. An object left open at the end of the text is dropped.
pub fn balanced_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    objects.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    objects
}

/// First top-level balanced `{...}` substring, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    balanced_objects(text).into_iter().next()
}

/// Parse model output into an [`AnalysisResult`].
///
/// The first balanced object is the only candidate; the whole trimmed text is
/// parsed only when the output contains no balanced object at all. Anything
/// that is not a JSON object is a [`Error::MalformedResponse`] holding the
/// raw text.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult> {
    let candidate = extract_json_object(text).unwrap_or_else(|| text.trim());

    let object = match serde_json::from_str::<Value>(candidate) {
        Ok(value) if value.is_object() => value,
        Ok(_) => return Err(malformed(text, "expected a JSON object".to_string())),
        Err(e) => return Err(malformed(text, e.to_string())),
    };

    serde_json::from_value(object).map_err(|e| malformed(text, e.to_string()))
}

fn malformed(raw: &str, reason: String) -> Error {
    tracing::error!("Could not extract analysis JSON: {}", reason);
    Error::MalformedResponse {
        raw: raw.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(root: &str, explanation: &str, steps: &[&str]) -> AnalysisResult {
        AnalysisResult {
            root_cause: root.to_string(),
            explanation: explanation.to_string(),
            next_steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_fenced_response_with_prose() {
        let text = "Sure! ```json\n{\"rootCause\":\"X\",\"explanation\":\"Y\",\"nextSteps\":[\"A\",\"B\"]}\n```";
        assert_eq!(parse_analysis(text).unwrap(), result("X", "Y", &["A", "B"]));
    }

    #[test]
    fn test_plain_json_with_empty_steps() {
        let text = r#"{"rootCause":"X","explanation":"Y","nextSteps":[]}"#;
        assert_eq!(parse_analysis(text).unwrap(), result("X", "Y", &[]));
    }

    #[test]
    fn test_prose_without_braces_is_malformed() {
        let text = "I could not determine the cause of this failure.";
        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert_eq!(err.raw_response(), Some(text));
    }

    #[test]
    fn test_braces_inside_strings_do_not_break_nesting() {
        let text = r#"Here you go: {"rootCause":"map lookup {key} failed","explanation":"a \"}\" in a string","nextSteps":["check {config}","retry } later"]} thanks"#;
        let parsed = parse_analysis(text).unwrap();
        assert_eq!(parsed.root_cause, "map lookup {key} failed");
        assert_eq!(parsed.explanation, "a \"}\" in a string");
        assert_eq!(parsed.next_steps, vec!["check {config}", "retry } later"]);
    }

    #[test]
    fn test_nested_objects_stay_in_one_candidate() {
        let text = r#"{"rootCause":"X","meta":{"inner":{"deep":1}},"explanation":"Y","nextSteps":["A"]}"#;
        assert_eq!(balanced_objects(text), vec![text]);
        assert_eq!(parse_analysis(text).unwrap(), result("X", "Y", &["A"]));
    }

    #[test]
    fn test_first_fragment_that_is_not_json_is_malformed() {
        let text = r#"Placeholders like {name} appear. Answer: {"rootCause":"X","explanation":"Y","nextSteps":["A"]}"#;
        assert_eq!(balanced_objects(text).len(), 2);
        assert_eq!(extract_json_object(text), Some("{name}"));

        let err = parse_analysis(text).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert_eq!(err.raw_response(), Some(text));
    }

    #[test]
    fn test_first_valid_object_wins_over_later_ones() {
        let text = r#"{"note":"context"} then {"rootCause":"X"}"#;
        assert_eq!(parse_analysis(text).unwrap(), AnalysisResult::default());
    }

    #[test]
    fn test_stray_quote_in_prose_hides_later_answer() {
        let text = r#"Use {"x} in config. {"rootCause":"X","explanation":"Y","nextSteps":[]}"#;
        assert!(balanced_objects(text).is_empty());
        assert!(matches!(
            parse_analysis(text).unwrap_err(),
            Error::MalformedResponse { .. }
        ));
    }

    #[test]
    fn test_unbalanced_object_is_malformed() {
        let text = r#"{"rootCause":"X","explanation":"truncated"#;
        assert!(balanced_objects(text).is_empty());
        let err = parse_analysis(text).unwrap_err();
        assert_eq!(err.raw_response(), Some(text));
    }

    #[test]
    fn test_stray_closing_brace_is_ignored() {
        let text = r#"} oops {"rootCause":"X"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"rootCause":"X"}"#));
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        assert!(matches!(
            parse_analysis("[\"A\", \"B\"]").unwrap_err(),
            Error::MalformedResponse { .. }
        ));
    }

    #[test]
    fn test_missing_fields_are_left_empty() {
        let parsed = parse_analysis(r#"{"rootCause":"only this"}"#).unwrap();
        assert_eq!(parsed, result("only this", "", &[]));
    }

    #[test]
    fn test_loosely_typed_fields_are_accepted() {
        let parsed =
            parse_analysis(r#"{"rootCause":null,"explanation":42,"nextSteps":"Restart the worker"}"#)
                .unwrap();
        assert_eq!(parsed, result("", "42", &["Restart the worker"]));
    }

    #[test]
    fn test_multibyte_text_around_object() {
        let text = "Voilà, résumé: {\"rootCause\":\"é\",\"explanation\":\"ü\",\"nextSteps\":[\"→\"]} ✓";
        assert_eq!(parse_analysis(text).unwrap(), result("é", "ü", &["→"]));
    }
}

//! Terminal rendering of analysis results.

use crate::models::AnalysisResult;
use crate::Result;
use std::fmt::Write as _;

const MISSING: &str = "(not provided by the model)";

/// Human-readable report with one section per field and numbered steps.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    section(&mut out, "ROOT CAUSE", &result.root_cause);
    out.push('\n');
    section(&mut out, "EXPLANATION", &result.explanation);
    out.push('\n');

    heading(&mut out, "NEXT STEPS");
    if result.next_steps.is_empty() {
        let _ = writeln!(out, "  {}", MISSING);
    }
    for (i, step) in result.next_steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step.trim());
    }

    out
}

/// Pretty-printed JSON using the `rootCause` / `explanation` / `nextSteps` keys.
pub fn render_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
}

fn section(out: &mut String, title: &str, body: &str) {
    heading(out, title);
    let body = body.trim();
    if body.is_empty() {
        let _ = writeln!(out, "  {}", MISSING);
        return;
    }
    for line in body.lines() {
        let _ = writeln!(out, "  {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_text_layout() {
        let result = AnalysisResult {
            root_cause: "Pool exhausted".to_string(),
            explanation: "Too many open connections.\nRequests queued.".to_string(),
            next_steps: vec!["Raise pool size".to_string(), " Add timeouts ".to_string()],
        };

        let expected = "\
ROOT CAUSE
==========
  Pool exhausted

EXPLANATION
===========
  Too many open connections.
  Requests queued.

NEXT STEPS
==========
  1. Raise pool size
  2. Add timeouts
";
        assert_eq!(render_text(&result), expected);
    }

    #[test]
    fn test_render_text_marks_missing_fields() {
        let text = render_text(&AnalysisResult::default());
        assert_eq!(text.matches(MISSING).count(), 3);
    }

    #[test]
    fn test_render_json_keys() {
        let json = render_json(&AnalysisResult {
            root_cause: "X".to_string(),
            explanation: "Y".to_string(),
            next_steps: vec![],
        })
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "rootCause": "X", "explanation": "Y", "nextSteps": [] })
        );
    }
}

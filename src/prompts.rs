pub const ANALYSIS: &str = include_str!("../data/prompts/analysis.txt");

pub const NO_LOG_PLACEHOLDER: &str = "No log provided.";
pub const NO_CONTEXT_PLACEHOLDER: &str = "No additional context provided.";

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single pass over the template: inserted values are never
/// scanned for placeholders. Unknown keys are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let key = &after[..close];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }

    result.push_str(rest);
    result
}

/// Build the analysis instruction, substituting placeholders for empty inputs.
pub fn analysis_prompt(log: &str, context: &str) -> String {
    let log = if log.is_empty() {
        NO_LOG_PLACEHOLDER
    } else {
        log
    };
    let context = if context.is_empty() {
        NO_CONTEXT_PLACEHOLDER
    } else {
        context
    };

    render(ANALYSIS, &[("log", log), ("context", context)])
}

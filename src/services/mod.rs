//! Services: parsers, prompt builders, convergence measurement, and the
//! orchestrator that sequences them.

pub mod config;
pub mod decision_engine;
pub mod evaluation_parser;
pub mod judge;
pub mod plan_parser;
pub mod planner;
pub mod orchestrator;
pub mod similarity;
pub mod stability_tracker;

pub use config::{Config, ConfigError, OrchestratorConfig};
pub use decision_engine::DecisionEngine;
pub use judge::BlindJudge;
pub use orchestrator::Orchestrator;
pub use planner::Planner;
pub use stability_tracker::StabilityTracker;

/// Extract the first balanced `{...}` block from model output.
///
/// Models routinely wrap JSON in Markdown fences or prose; everything
/// before the first `{` and after its matching `}` is ignored. The scan is
/// string-literal and escape aware so braces inside JSON strings do not
/// unbalance the depth count.
pub(crate) fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    // Both endpoints are ASCII, so the slice is valid UTF-8.
                    return Some(&text[start..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_object() {
        assert_eq!(
            extract_first_json_object(r#"{"goals": []}"#),
            Some(r#"{"goals": []}"#)
        );
    }

    #[test]
    fn test_tolerates_markdown_fences() {
        let input = "Here is the plan:\n```json\n{\"goals\": [\"x\"]}\n```\nDone.";
        assert_eq!(
            extract_first_json_object(input),
            Some("{\"goals\": [\"x\"]}")
        );
    }

    #[test]
    fn test_nested_objects_stay_balanced() {
        let input = r#"noise {"a": {"b": {"c": 1}}} trailing {"d": 2}"#;
        assert_eq!(
            extract_first_json_object(input),
            Some(r#"{"a": {"b": {"c": 1}}}"#)
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let input = r#"{"text": "a } b { c", "n": "\" }"}"#;
        assert_eq!(extract_first_json_object(input), Some(input));
    }

    #[test]
    fn test_no_object_returns_none() {
        assert_eq!(extract_first_json_object("no json here"), None);
        assert_eq!(extract_first_json_object("{ unbalanced"), None);
        assert_eq!(extract_first_json_object(""), None);
    }
}

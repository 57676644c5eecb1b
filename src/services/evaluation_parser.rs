//! Evaluation parser: free-form model text to a [`BlindEvaluation`].
//!
//! Unlike the plan parser, this one never fails: an unparseable
//! evaluation is a normal outcome and is substituted with the
//! conservative default, which records a contradiction so the round can
//! never terminate as task-complete on garbage output.

use serde_json::Value;

use crate::domain::models::{BlindEvaluation, VsGoal, VsPrevious, EVALUATION_LIST_CAP};
use crate::services::extract_first_json_object;

/// Parse a blind evaluation from model output. Infallible by contract.
pub fn parse_evaluation(text: &str) -> BlindEvaluation {
    try_parse(text).unwrap_or_else(BlindEvaluation::conservative_default)
}

fn try_parse(text: &str) -> Option<BlindEvaluation> {
    let block = extract_first_json_object(text)?;
    let value: Value = serde_json::from_str(block).ok()?;
    let obj = value.as_object()?;

    Some(BlindEvaluation {
        vs_previous: obj
            .get("vs_previous")
            .and_then(Value::as_str)
            .and_then(VsPrevious::parse)
            .unwrap_or_default(),
        vs_goal: obj
            .get("vs_goal")
            .and_then(Value::as_str)
            .and_then(VsGoal::parse)
            .unwrap_or_default(),
        contradictions: capped_string_list(obj.get("contradictions")),
        missing: capped_string_list(obj.get("missing")),
        risks: capped_string_list(obj.get("risks")),
    })
}

/// Coerce a list field to strings and truncate to the evaluation cap.
fn capped_string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .take(EVALUATION_LIST_CAP)
                .collect()
        })
        .unwrap_or_default()
}

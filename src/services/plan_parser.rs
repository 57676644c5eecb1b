//! Plan parser: free-form model text to a structured [`Plan`].
//!
//! The parser is lenient about shape (missing keys become empty lists,
//! malformed entries are dropped or defaulted) but strict about presence:
//! no balanced brace block, or a block that is not a JSON object, is a
//! [`CoreError::PlanParse`] and ends the run.

use serde_json::Value;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{Plan, PlanTask, TaskPriority};
use crate::services::extract_first_json_object;

/// Description used when a task entry carries none.
const UNKNOWN_TASK: &str = "Unknown task";

/// Parse a plan from model output.
pub fn parse_plan(text: &str) -> CoreResult<Plan> {
    let block = extract_first_json_object(text)
        .ok_or_else(|| CoreError::PlanParse("no JSON object found in model output".to_string()))?;

    let value: Value = serde_json::from_str(block)
        .map_err(|e| CoreError::PlanParse(format!("invalid JSON in model output: {e}")))?;

    let goals = string_entries(value.get("goals"));
    let constraints = string_entries(value.get("constraints"));
    let tasks = task_entries(value.get("tasks"));

    Ok(Plan::new(goals, tasks, constraints))
}

/// Keep only the string entries of an optional JSON array.
fn string_entries(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Coerce the task array. Non-object entries are dropped, parallel to the
/// string-only filter on goals and constraints.
fn task_entries(value: Option<&Value>) -> Vec<PlanTask> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_task).collect())
        .unwrap_or_default()
}

fn parse_task(value: &Value) -> Option<PlanTask> {
    let obj = value.as_object()?;

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_TASK)
        .to_string();

    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .and_then(TaskPriority::parse)
        .unwrap_or_default();

    let dependencies = string_entries(obj.get("dependencies"));

    Some(PlanTask::new(description, priority).with_dependencies(dependencies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskStatus;

    #[test]
    fn test_parses_full_plan() {
        let text = r#"{
            "goals": ["Ship X", "Document X"],
            "tasks": [
                {"description": "do X", "priority": "high", "dependencies": ["design X"]},
                {"description": "test X", "priority": "low"}
            ],
            "constraints": ["budget"]
        }"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.goals, vec!["Ship X", "Document X"]);
        assert_eq!(plan.constraints, vec!["budget"]);
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].description, "do X");
        assert_eq!(plan.tasks[0].priority, TaskPriority::High);
        assert_eq!(plan.tasks[0].dependencies, vec!["design X"]);
        assert_eq!(plan.tasks[1].priority, TaskPriority::Low);
        assert!(plan.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[test]
    fn test_parses_plan_wrapped_in_markdown() {
        let text = "Sure, here is your plan:\n```json\n{\"goals\": [\"g\"], \"tasks\": [], \"constraints\": []}\n```";
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.goals, vec!["g"]);
    }

    #[test]
    fn test_missing_description_defaults() {
        let text = r#"{"goals": [], "tasks": [{"priority": "high"}], "constraints": []}"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.tasks[0].description, "Unknown task");
    }

    #[test]
    fn test_invalid_priority_falls_back_to_medium() {
        let text = r#"{"tasks": [{"description": "t", "priority": "critical"}]}"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.tasks[0].priority, TaskPriority::Medium);
    }

    #[test]
    fn test_non_string_entries_are_dropped() {
        let text = r#"{
            "goals": ["keep", 42, null, {"nested": true}],
            "tasks": [{"description": "t", "dependencies": ["a", 1, false]}],
            "constraints": [true, "only this"]
        }"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.goals, vec!["keep"]);
        assert_eq!(plan.tasks[0].dependencies, vec!["a"]);
        assert_eq!(plan.constraints, vec!["only this"]);
    }

    #[test]
    fn test_non_object_tasks_are_dropped() {
        let text = r#"{"tasks": ["just a string", {"description": "real"}]}"#;
        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].description, "real");
    }

    #[test]
    fn test_missing_keys_become_empty() {
        let plan = parse_plan("{}").unwrap();
        assert!(plan.goals.is_empty());
        assert!(plan.tasks.is_empty());
        assert!(plan.constraints.is_empty());
    }

    #[test]
    fn test_no_brace_block_is_an_error() {
        let err = parse_plan("I could not produce a plan.").unwrap_err();
        assert!(matches!(err, CoreError::PlanParse(_)));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_plan(r#"{"goals": [}"#).unwrap_err();
        assert!(matches!(err, CoreError::PlanParse(_)));
    }

    #[test]
    fn test_task_ids_are_unique_within_a_plan() {
        let text = r#"{"tasks": [{"description": "a"}, {"description": "b"}]}"#;
        let plan = parse_plan(text).unwrap();
        assert_ne!(plan.tasks[0].id, plan.tasks[1].id);
    }
}

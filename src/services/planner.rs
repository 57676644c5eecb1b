//! Planner: prompt construction for both round phases, and validation of
//! refined plans against the locked structure.
//!
//! The architect prompt (round 1) establishes goals and constraints that
//! lock for the rest of the run. The refiner prompt (every later round)
//! restates the locked structure verbatim and the previous plan; its
//! signature requires both, so it cannot be built too early. Validation
//! never aborts a round: violations are returned for the orchestrator to
//! log.

use crate::domain::models::{LockedStructure, Plan};

/// Minimum token length for the core-decision keyword heuristic. Shorter
/// tokens (articles, prepositions) carry no signal.
const DECISION_KEYWORD_MIN_LEN: usize = 4;

/// Builds planning prompts and validates refiner output.
#[derive(Debug, Default)]
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self
    }

    /// Prompt for the architect round. Requests a JSON object with the
    /// keys `goals`, `tasks`, `constraints` exactly, and tells the model
    /// its structural choices will be locked.
    pub fn architect_prompt(&self, goal: &str, context: &str) -> String {
        let context_text = if context.is_empty() {
            "No additional context"
        } else {
            context
        };

        format!(
            r#"You are the architect for an iterative planning system.

## Goal
{goal}

## Context
{context_text}

## Instructions
Produce the initial plan for this goal. The goals and constraints you choose
become the LOCKED STRUCTURE for every later refinement round: they will not
change, so choose them deliberately. Prioritize correctness over
completeness; later rounds can add detail, but they cannot repair a wrong
foundation.

## Required Output Format (JSON)
Respond with a JSON object containing exactly these keys:
```json
{{
  "goals": ["concrete outcome the plan must achieve"],
  "tasks": [
    {{
      "description": "what needs to be done",
      "priority": "high|medium|low",
      "dependencies": ["descriptions of tasks this depends on"]
    }}
  ],
  "constraints": ["structural decision or boundary the plan commits to"]
}}
```

IMPORTANT: Output ONLY the JSON object, no other text."#
        )
    }

    /// Prompt for a refiner round. Restates the locked structure verbatim
    /// under an explicit DO NOT CHANGE clause, together with the previous
    /// plan. Requires both by signature.
    pub fn refiner_prompt(
        &self,
        goal: &str,
        context: &str,
        previous: &Plan,
        locked: &LockedStructure,
    ) -> String {
        let context_text = if context.is_empty() {
            "No additional context"
        } else {
            context
        };
        let locked_goals = bullet_list(&locked.goals);
        let locked_decisions = bullet_list(&locked.core_decisions);
        let previous_json = serde_json::to_string_pretty(previous)
            .unwrap_or_else(|_| "(previous plan unavailable)".to_string());

        format!(
            r#"You are refining an existing plan for an iterative planning system.

## Goal
{goal}

## Context
{context_text}

## LOCKED STRUCTURE (DO NOT CHANGE)
These goals and core decisions were fixed in round {round} and must appear
unchanged in your refined plan:

Goals:
{locked_goals}

Core decisions:
{locked_decisions}

## Previous Plan
{previous_json}

## Instructions
Refine the previous plan. You may:
- add tasks
- reword tasks or change their priority
- add clarifying constraints

You must NOT remove locked goals or locked constraints. A refinement that
drops any element of the locked structure is invalid.

## Required Output Format (JSON)
Respond with a JSON object containing exactly these keys:
```json
{{
  "goals": ["..."],
  "tasks": [{{"description": "...", "priority": "high|medium|low", "dependencies": ["..."]}}],
  "constraints": ["..."]
}}
```

IMPORTANT: Output ONLY the JSON object, no other text."#,
            round = locked.locked_at_round,
        )
    }

    /// Validate a refined plan against the locked structure.
    ///
    /// Returns one violation message per missing locked goal and per core
    /// decision whose keywords have dropped out of the plan. Callers log
    /// the violations; the round continues either way.
    pub fn validate_against_lock(&self, plan: &Plan, locked: &LockedStructure) -> Vec<String> {
        let mut violations = Vec::new();

        for goal in &locked.goals {
            if !plan.contains_goal(goal) {
                violations.push(format!("Locked goal removed: \"{goal}\""));
            }
        }

        let serialized = serde_json::to_string(plan)
            .unwrap_or_default()
            .to_lowercase();

        for decision in &locked.core_decisions {
            if !decision_keywords_present(decision, &serialized) {
                violations.push(format!("Core decision may be violated: \"{decision}\""));
            }
        }

        violations
    }
}

/// Keyword-coverage heuristic for core decisions: split the decision on
/// whitespace, keep tokens longer than four characters, and require at
/// least half of them to appear anywhere in the serialized plan.
fn decision_keywords_present(decision: &str, serialized_plan: &str) -> bool {
    let keywords: Vec<String> = decision
        .split_whitespace()
        .filter(|token| token.len() > DECISION_KEYWORD_MIN_LEN)
        .map(str::to_lowercase)
        .collect();

    if keywords.is_empty() {
        return true;
    }

    let matched = keywords
        .iter()
        .filter(|kw| serialized_plan.contains(kw.as_str()))
        .count();

    matched * 2 >= keywords.len()
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{PlanTask, TaskPriority};

    fn locked(goals: &[&str], decisions: &[&str]) -> LockedStructure {
        LockedStructure {
            goals: goals.iter().map(|s| s.to_string()).collect(),
            core_decisions: decisions.iter().map(|s| s.to_string()).collect(),
            locked_at_round: 1,
        }
    }

    #[test]
    fn test_architect_prompt_contract() {
        let prompt = Planner::new().architect_prompt("Ship X", "a small team");
        assert!(prompt.contains("Ship X"));
        assert!(prompt.contains("a small team"));
        assert!(prompt.contains("\"goals\""));
        assert!(prompt.contains("\"tasks\""));
        assert!(prompt.contains("\"constraints\""));
        assert!(prompt.contains("LOCKED STRUCTURE"));
        assert!(prompt.contains("Output ONLY the JSON object"));
    }

    #[test]
    fn test_architect_prompt_empty_context() {
        let prompt = Planner::new().architect_prompt("Ship X", "");
        assert!(prompt.contains("No additional context"));
    }

    #[test]
    fn test_refiner_prompt_names_locked_structure_verbatim() {
        let previous = Plan::new(
            vec!["Ship X".into(), "Keep Y stable".into()],
            vec![PlanTask::new("do X", TaskPriority::High)],
            vec!["single binary deployment".into()],
        );
        let lock = locked(
            &["Ship X", "Keep Y stable"],
            &["single binary deployment"],
        );
        let prompt = Planner::new().refiner_prompt("Ship X", "", &previous, &lock);

        assert!(prompt.contains("LOCKED STRUCTURE (DO NOT CHANGE)"));
        assert!(prompt.contains("- Ship X"));
        assert!(prompt.contains("- Keep Y stable"));
        assert!(prompt.contains("- single binary deployment"));
        assert!(prompt.contains("do X"));
        assert!(prompt.contains("must NOT remove locked goals"));
    }

    #[test]
    fn test_validation_reports_removed_goal() {
        let plan = Plan::new(vec!["A".into()], vec![], vec![]);
        let violations = Planner::new().validate_against_lock(&plan, &locked(&["A", "B"], &[]));
        assert_eq!(violations, vec!["Locked goal removed: \"B\""]);
    }

    #[test]
    fn test_validation_goal_match_is_case_insensitive() {
        let plan = Plan::new(vec!["ship the api".into()], vec![], vec![]);
        let violations =
            Planner::new().validate_against_lock(&plan, &locked(&["Ship The API"], &[]));
        assert!(violations.is_empty());
    }

    #[test]
    fn test_validation_reports_dropped_decision() {
        let plan = Plan::new(
            vec![],
            vec![PlanTask::new("rewrite everything in a new framework", TaskPriority::High)],
            vec![],
        );
        let lock = locked(&[], &["reuse existing postgres database schema"]);
        let violations = Planner::new().validate_against_lock(&plan, &lock);
        assert_eq!(
            violations,
            vec!["Core decision may be violated: \"reuse existing postgres database schema\""]
        );
    }

    #[test]
    fn test_validation_accepts_decision_with_keyword_coverage() {
        let plan = Plan::new(
            vec![],
            vec![PlanTask::new(
                "extend the postgres schema with an audit table",
                TaskPriority::Medium,
            )],
            vec!["reuse existing postgres database schema".into()],
        );
        let lock = locked(&[], &["reuse existing postgres database schema"]);
        // "postgres", "database", "schema", "existing", "reuse" -- enough
        // of the long tokens appear in the serialized plan.
        let violations = Planner::new().validate_against_lock(&plan, &lock);
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_validation_ignores_short_token_decisions() {
        // Every token is four characters or fewer: nothing to check.
        let plan = Plan::new(vec![], vec![], vec![]);
        let lock = locked(&[], &["do it now ok"]);
        assert!(Planner::new().validate_against_lock(&plan, &lock).is_empty());
    }
}

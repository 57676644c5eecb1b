//! Blind judge: qualitative plan evaluation prompts and advisory concern
//! detection.
//!
//! The judge never asks for, and the parsers never accept, a numeric
//! score. A model grading its own plans will inflate any number it is
//! allowed to emit; enum comparisons and finding lists are much harder to
//! game. Concerns computed over the evaluation history are advisory only:
//! the decision engine derives its termination conditions from raw state.

use serde::{Deserialize, Serialize};

use crate::domain::models::{BlindEvaluation, LockedStructure, Plan, VsGoal, VsPrevious};

/// Contradiction count at which the history is considered alarming.
const CONTRADICTION_ALARM: usize = 5;
/// Missing-element count at which the history is considered alarming.
const MISSING_ALARM: usize = 10;
/// Risk count at which the history is considered alarming.
const RISK_ALARM: usize = 5;

/// Severity of an advisory concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcernSeverity {
    Low,
    Medium,
    High,
}

/// An advisory concern raised over the evaluation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    pub message: String,
    pub severity: ConcernSeverity,
}

/// Builds evaluation prompts and inspects evaluation history.
#[derive(Debug, Default)]
pub struct BlindJudge;

impl BlindJudge {
    pub fn new() -> Self {
        Self
    }

    /// Prompt for a blind evaluation of the current plan. Requests a JSON
    /// object with the keys `vs_previous`, `vs_goal`, `contradictions`,
    /// `missing`, `risks` exactly, and prohibits numeric scores.
    pub fn evaluation_prompt(
        &self,
        current: &Plan,
        previous: Option<&Plan>,
        goal: &str,
        locked: Option<&LockedStructure>,
    ) -> String {
        let current_json = serde_json::to_string_pretty(current)
            .unwrap_or_else(|_| "(plan unavailable)".to_string());

        let previous_section = match previous {
            Some(plan) => format!(
                "## Previous Plan\n{}",
                serde_json::to_string_pretty(plan)
                    .unwrap_or_else(|_| "(previous plan unavailable)".to_string())
            ),
            None => "## Previous Plan\nNone. This is the first round; use \"same\" for vs_previous.".to_string(),
        };

        let locked_section = match locked {
            Some(lock) => format!(
                "## Locked Structure\nGoals:\n{}\nCore decisions:\n{}",
                bullet_list(&lock.goals),
                bullet_list(&lock.core_decisions)
            ),
            None => String::new(),
        };

        format!(
            r#"You are a blind judge evaluating a plan. Provide qualitative
assessments only; do NOT provide numeric scores of any kind.

## Goal
{goal}

{previous_section}

## Current Plan
{current_json}

{locked_section}

## Instructions
Compare the current plan against the previous plan and against the goal.
List concrete contradictions within the plan, elements the plan is missing,
and risks it carries. Be specific; an empty list is a valid answer.

## Required Output Format (JSON)
Respond with a JSON object containing exactly these keys:
```json
{{
  "vs_previous": "better|same|worse",
  "vs_goal": "closer|same|farther",
  "contradictions": ["internal contradiction in the plan"],
  "missing": ["element the plan should have but does not"],
  "risks": ["risk the plan carries"]
}}
```
At most 10 entries per list. No numbers, no ratings, no percentages.

IMPORTANT: Output ONLY the JSON object, no other text."#
        )
    }

    /// Inspect the evaluation history (oldest first, latest last) for
    /// concerning patterns. Advisory: the orchestrator logs these.
    pub fn detect_concerns(&self, history: &[BlindEvaluation]) -> Vec<Concern> {
        let mut concerns = Vec::new();
        let Some(latest) = history.last() else {
            return concerns;
        };
        let prior = history.len().checked_sub(2).and_then(|i| history.get(i));

        if latest.vs_previous == VsPrevious::Worse {
            concerns.push(Concern {
                message: "Plan degrading: judged worse than the previous round".to_string(),
                severity: ConcernSeverity::Medium,
            });
        }

        if latest.vs_goal == VsGoal::Farther {
            concerns.push(Concern {
                message: "Plan diverging: judged farther from the goal".to_string(),
                severity: ConcernSeverity::High,
            });
        }

        if let Some(prior) = prior {
            if latest.contradictions.len() > prior.contradictions.len() {
                concerns.push(Concern {
                    message: format!(
                        "Contradictions increasing: {} now vs {} before",
                        latest.contradictions.len(),
                        prior.contradictions.len()
                    ),
                    severity: ConcernSeverity::Medium,
                });
            }
        }

        if latest.contradictions.len() >= CONTRADICTION_ALARM {
            concerns.push(Concern {
                message: format!(
                    "Too many contradictions: {}",
                    latest.contradictions.len()
                ),
                severity: ConcernSeverity::High,
            });
        }

        if latest.missing.len() >= MISSING_ALARM {
            concerns.push(Concern {
                message: format!("Many elements missing: {}", latest.missing.len()),
                severity: ConcernSeverity::Medium,
            });
        }

        if latest.risks.len() >= RISK_ALARM {
            concerns.push(Concern {
                message: format!("Multiple risks identified: {}", latest.risks.len()),
                severity: ConcernSeverity::Medium,
            });
        }

        concerns
    }
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

//! Plan model: the structured output of one planning round.
//!
//! A plan is created once per round and never mutated. Task order is
//! significant only for display; identity of goals and constraints is by
//! case-insensitive string equality.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority of a single plan task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Parse a priority string from model output. Unrecognized values
    /// return `None`; the plan parser falls back to `Medium`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Lifecycle status of a plan task.
///
/// Present for extensibility; the planning core creates every task as
/// `Pending` and never advances it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Complete,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A single task within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: Uuid,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Descriptions of tasks this one depends on.
    pub dependencies: Vec<String>,
}

impl PlanTask {
    pub fn new(description: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// A complete plan produced by one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub goals: Vec<String>,
    pub tasks: Vec<PlanTask>,
    pub constraints: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(goals: Vec<String>, tasks: Vec<PlanTask>, constraints: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goals,
            tasks,
            constraints,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive membership test against the plan's goals.
    pub fn contains_goal(&self, goal: &str) -> bool {
        let needle = goal.to_lowercase();
        self.goals.iter().any(|g| g.to_lowercase() == needle)
    }
}

/// The structural decisions captured from the architect round.
///
/// Derived exactly once, from the round-1 plan; immutable for the rest of
/// the run. Every refiner plan is validated against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedStructure {
    pub goals: Vec<String>,
    pub core_decisions: Vec<String>,
    pub locked_at_round: u32,
}

impl LockedStructure {
    /// Capture the locked structure from an architect plan. Core decisions
    /// are the plan's constraints.
    pub fn from_plan(plan: &Plan, round: u32) -> Self {
        Self {
            goals: plan.goals.clone(),
            core_decisions: plan.constraints.clone(),
            locked_at_round: round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_fallback() {
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("HIGH"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("medium"), Some(TaskPriority::Medium));
        assert_eq!(TaskPriority::parse("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("urgent"), None);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = PlanTask::new("write tests", TaskPriority::High);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.dependencies.is_empty());
    }

    #[test]
    fn test_contains_goal_is_case_insensitive() {
        let plan = Plan::new(vec!["Ship X".into()], vec![], vec![]);
        assert!(plan.contains_goal("ship x"));
        assert!(plan.contains_goal("SHIP X"));
        assert!(!plan.contains_goal("ship y"));
    }

    #[test]
    fn test_locked_structure_captures_constraints_as_decisions() {
        let plan = Plan::new(
            vec!["a".into()],
            vec![],
            vec!["use sqlite".into(), "stay offline".into()],
        );
        let locked = LockedStructure::from_plan(&plan, 1);
        assert_eq!(locked.goals, plan.goals);
        assert_eq!(locked.core_decisions, plan.constraints);
        assert_eq!(locked.locked_at_round, 1);
    }

    #[test]
    fn test_plan_ids_are_unique() {
        let a = Plan::new(vec![], vec![], vec![]);
        let b = Plan::new(vec![], vec![], vec![]);
        assert_ne!(a.id, b.id);
    }
}

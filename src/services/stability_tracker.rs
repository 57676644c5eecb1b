//! Stability tracker: reduces the current plan, the previous plan, and
//! the latest blind evaluation into [`StabilityMetrics`].
//!
//! Signals that need a previous plan return the neutral 0.5 on the first
//! round so an architect round is neither rewarded nor punished for
//! having no history.

use crate::domain::models::{BlindEvaluation, Plan, StabilityMetrics, StabilityWeights};
use crate::services::similarity::{bigram_similarity, jaccard, FUZZY_MATCH_THRESHOLD};

/// Contradiction count at which the contradiction ratio saturates.
const CONTRADICTION_SATURATION: f64 = 5.0;
/// Neutral value for signals that need a previous plan.
const NEUTRAL: f64 = 0.5;

/// Weight on vs_goal within the goal-convergence signal.
const GOAL_SIGNAL_WEIGHT: f64 = 0.7;
/// Weight on vs_previous within the goal-convergence signal.
const PREVIOUS_SIGNAL_WEIGHT: f64 = 0.3;

/// Computes stability metrics for one round.
#[derive(Debug)]
pub struct StabilityTracker {
    weights: StabilityWeights,
}

impl StabilityTracker {
    /// Construct with the default weights. Panics if the weights do not
    /// sum to 1.0, which pins the convex-combination invariant at startup.
    pub fn new() -> Self {
        Self::with_weights(StabilityWeights::default())
    }

    pub fn with_weights(weights: StabilityWeights) -> Self {
        assert!(
            (weights.sum() - 1.0).abs() < 1e-9,
            "stability weights must sum to 1.0, got {}",
            weights.sum()
        );
        Self { weights }
    }

    /// Compute the four signals and their combination.
    pub fn compute(
        &self,
        current: &Plan,
        previous: Option<&Plan>,
        evaluation: &BlindEvaluation,
    ) -> StabilityMetrics {
        let contradiction_ratio = contradiction_ratio(evaluation);
        let decision_reuse_rate = decision_reuse_rate(current, previous);
        let plan_similarity = plan_similarity(current, previous);
        let goal_convergence = goal_convergence(evaluation);

        // The contradiction ratio measures instability, so it enters the
        // combination inverted.
        let overall = self.weights.contradiction * (1.0 - contradiction_ratio)
            + self.weights.reuse * decision_reuse_rate
            + self.weights.similarity * plan_similarity
            + self.weights.goal * goal_convergence;

        StabilityMetrics {
            contradiction_ratio,
            decision_reuse_rate,
            plan_similarity,
            goal_convergence,
            overall_stability: round_two(overall),
        }
    }
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// `min(contradictions / 5, 1)`.
fn contradiction_ratio(evaluation: &BlindEvaluation) -> f64 {
    (evaluation.contradictions.len() as f64 / CONTRADICTION_SATURATION).min(1.0)
}

/// Fraction of the current plan's flattened elements that fuzzily restate
/// an element of the previous plan. No previous plan is neutral (0.5).
fn decision_reuse_rate(current: &Plan, previous: Option<&Plan>) -> f64 {
    let Some(previous) = previous else {
        return NEUTRAL;
    };

    let prev_items = flatten(previous);
    let curr_items = flatten(current);

    let reused = curr_items
        .iter()
        .filter(|item| {
            prev_items
                .iter()
                .any(|prev| bigram_similarity(item, prev) > FUZZY_MATCH_THRESHOLD)
        })
        .count();

    reused as f64 / curr_items.len().max(1) as f64
}

/// Goals, constraints, and lowercase task descriptions as one list.
fn flatten(plan: &Plan) -> Vec<String> {
    plan.goals
        .iter()
        .cloned()
        .chain(plan.constraints.iter().cloned())
        .chain(plan.tasks.iter().map(|t| t.description.to_lowercase()))
        .collect()
}

/// Mean of goal-set Jaccard, constraint-set Jaccard, and a task-count
/// signal. No previous plan is neutral (0.5).
fn plan_similarity(current: &Plan, previous: Option<&Plan>) -> f64 {
    let Some(previous) = previous else {
        return NEUTRAL;
    };

    let goal_sim = jaccard(&current.goals, &previous.goals);
    let constraint_sim = jaccard(&current.constraints, &previous.constraints);

    let tasks_a = current.tasks.len() as f64;
    let tasks_b = previous.tasks.len() as f64;
    let task_sim = 1.0 - (tasks_a - tasks_b).abs() / tasks_a.max(tasks_b).max(1.0);

    (goal_sim + constraint_sim + task_sim) / 3.0
}

/// `0.7 * m(vs_goal) + 0.3 * m(vs_previous)` with m mapping the positive
/// direction to 1.0, neutral to 0.5, negative to 0.0.
fn goal_convergence(evaluation: &BlindEvaluation) -> f64 {
    GOAL_SIGNAL_WEIGHT * evaluation.vs_goal.signal()
        + PREVIOUS_SIGNAL_WEIGHT * evaluation.vs_previous.signal()
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

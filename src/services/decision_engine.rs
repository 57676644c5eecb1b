//! Decision engine: prioritized termination rules.
//!
//! The rules are applied in strict priority order; the first match wins.
//! Completion evidence (nothing missing, no contradictions) outranks
//! stability, which outranks the round cap, which outranks the negative
//! signals. A separate validation pass may attach advisory warnings to a
//! terminating decision; warnings never change the decision.

use crate::domain::models::{
    BlindEvaluation, DecisionWarning, RoundState, StabilityMetrics, TerminationDecision,
    TerminationReason, VsGoal,
};
use crate::services::config::OrchestratorConfig;

/// Confidence attached to each rule, fixed by design.
const TASK_COMPLETE_CONFIDENCE: f64 = 0.95;
const MAX_ROUNDS_CONFIDENCE: f64 = 1.0;
const GOAL_DIVERGING_CONFIDENCE: f64 = 0.85;
const CONTRADICTION_TREND_CONFIDENCE: f64 = 0.75;
/// Warnings fire when a run terminates below this confidence.
const LOW_CONFIDENCE_FLOOR: f64 = 0.7;

/// Applies the termination rules for one round.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: OrchestratorConfig,
}

impl DecisionEngine {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Decide whether the run terminates after the current round.
    ///
    /// `history` holds the archived rounds in order; `current` is the
    /// round just evaluated (its own evaluation is passed separately
    /// because the decision runs before the round is archived).
    pub fn decide(
        &self,
        current: &RoundState,
        history: &[RoundState],
        evaluation: &BlindEvaluation,
        stability: &StabilityMetrics,
    ) -> TerminationDecision {
        // 1. Task complete: nothing missing and no contradictions.
        if evaluation.is_clean() {
            return TerminationDecision::terminate(
                TerminationReason::TaskComplete,
                TASK_COMPLETE_CONFIDENCE,
            );
        }

        // 2. Stability reached the configured threshold.
        if stability.overall_stability >= self.config.stability_threshold {
            return TerminationDecision::terminate(
                TerminationReason::StabilityAchieved,
                stability.overall_stability,
            );
        }

        // 3. Hard round cap.
        if current.number >= self.config.max_rounds {
            return TerminationDecision::terminate(
                TerminationReason::MaxRoundsReached,
                MAX_ROUNDS_CONFIDENCE,
            );
        }

        // 4. Sustained divergence from the goal.
        if self.diverging_tail_len(history, evaluation) >= self.config.goal_divergence_limit {
            return TerminationDecision::terminate(
                TerminationReason::GoalDiverging,
                GOAL_DIVERGING_CONFIDENCE,
            );
        }

        // 5. Contradiction counts trending up.
        if contradiction_trend_up(history, evaluation) {
            return TerminationDecision::terminate(
                TerminationReason::ContradictionTrendUp,
                CONTRADICTION_TREND_CONFIDENCE,
            );
        }

        // 6. Keep refining. Confidence mirrors how unstable the plan is.
        TerminationDecision::proceed((1.0 - stability.overall_stability).clamp(0.0, 1.0))
    }

    /// Length of the trailing run of `farther` judgments, counting the
    /// current evaluation and walking back through archived history.
    fn diverging_tail_len(&self, history: &[RoundState], current: &BlindEvaluation) -> usize {
        if current.vs_goal != VsGoal::Farther {
            return 0;
        }
        let archived_tail = history
            .iter()
            .rev()
            .filter_map(|round| round.evaluation.as_ref())
            .take_while(|eval| eval.vs_goal == VsGoal::Farther)
            .count();
        archived_tail + 1
    }

    /// Attach advisory warnings to a termination decision. The decision
    /// stands regardless.
    pub fn validate_decision(
        &self,
        decision: &TerminationDecision,
        evaluation: &BlindEvaluation,
    ) -> Vec<DecisionWarning> {
        let mut warnings = Vec::new();
        if !decision.should_terminate {
            return warnings;
        }

        if !evaluation.missing.is_empty()
            && decision.reason != TerminationReason::MaxRoundsReached
        {
            warnings.push(DecisionWarning {
                message: format!(
                    "Terminating with {} missing item(s) remaining ({})",
                    evaluation.missing.len(),
                    decision.reason
                ),
            });
        }

        if decision.confidence < LOW_CONFIDENCE_FLOOR {
            warnings.push(DecisionWarning {
                message: format!(
                    "Terminating with low confidence {:.2}",
                    decision.confidence
                ),
            });
        }

        if !evaluation.risks.is_empty() {
            warnings.push(DecisionWarning {
                message: format!(
                    "Terminating while {} risk(s) remain",
                    evaluation.risks.len()
                ),
            });
        }

        warnings
    }
}

/// The contradiction trend fires only with at least two archived rounds:
/// their counts must be non-decreasing and the current count must be
/// strictly greater than the last archived one. Short histories are never
/// vacuously trending.
fn contradiction_trend_up(history: &[RoundState], current: &BlindEvaluation) -> bool {
    let archived: Vec<usize> = history
        .iter()
        .filter_map(|round| round.evaluation.as_ref())
        .map(|eval| eval.contradictions.len())
        .collect();

    let [.., second_last, last] = archived.as_slice() else {
        return false;
    };

    second_last <= last && current.contradictions.len() > *last
}

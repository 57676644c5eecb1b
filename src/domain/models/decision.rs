//! Termination decisions and their advisory warnings.

use serde::{Deserialize, Serialize};

/// Why a run ended (or why it continues). Ranked by the decision engine's
/// fixed rule priority; `Continue` is the non-terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminationReason {
    StabilityAchieved,
    MaxRoundsReached,
    ContradictionTrendUp,
    GoalDiverging,
    TaskComplete,
    Continue,
}

impl TerminationReason {
    /// Whether a run ending for this reason counts as a success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::StabilityAchieved | Self::TaskComplete)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::StabilityAchieved => "stability achieved",
            Self::MaxRoundsReached => "max rounds reached",
            Self::ContradictionTrendUp => "contradiction trend rising",
            Self::GoalDiverging => "diverging from goal",
            Self::TaskComplete => "task complete",
            Self::Continue => "continue",
        };
        write!(f, "{label}")
    }
}

/// The decision engine's verdict for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationDecision {
    pub should_terminate: bool,
    pub reason: TerminationReason,
    /// Confidence in the decision, in [0, 1].
    pub confidence: f64,
}

impl TerminationDecision {
    pub fn terminate(reason: TerminationReason, confidence: f64) -> Self {
        Self {
            should_terminate: true,
            reason,
            confidence,
        }
    }

    pub fn proceed(confidence: f64) -> Self {
        Self {
            should_terminate: false,
            reason: TerminationReason::Continue,
            confidence,
        }
    }
}

/// Advisory warning attached to a termination decision. Warnings are
/// logged; the decision stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionWarning {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reasons() {
        assert!(TerminationReason::StabilityAchieved.is_success());
        assert!(TerminationReason::TaskComplete.is_success());
        assert!(!TerminationReason::MaxRoundsReached.is_success());
        assert!(!TerminationReason::ContradictionTrendUp.is_success());
        assert!(!TerminationReason::GoalDiverging.is_success());
        assert!(!TerminationReason::Continue.is_success());
    }

    #[test]
    fn test_reason_serializes_camel_case() {
        let json = serde_json::to_string(&TerminationReason::StabilityAchieved).unwrap();
        assert_eq!(json, "\"stabilityAchieved\"");
        let json = serde_json::to_string(&TerminationReason::MaxRoundsReached).unwrap();
        assert_eq!(json, "\"maxRoundsReached\"");
    }

    #[test]
    fn test_constructors() {
        let d = TerminationDecision::terminate(TerminationReason::TaskComplete, 0.95);
        assert!(d.should_terminate);
        assert_eq!(d.reason, TerminationReason::TaskComplete);

        let c = TerminationDecision::proceed(0.4);
        assert!(!c.should_terminate);
        assert_eq!(c.reason, TerminationReason::Continue);
    }
}

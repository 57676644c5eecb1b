//! Stability metrics: the scalar reduction of qualitative and structural
//! convergence signals.
//!
//! Four normalized signals are combined into `overall_stability`:
//!
//! - **contradiction_ratio** -- how contradiction-laden the latest
//!   evaluation is. Enters the combination inverted.
//! - **decision_reuse_rate** -- how much of the current plan fuzzily
//!   restates the previous plan.
//! - **plan_similarity** -- structural similarity between consecutive
//!   plans (goal sets, constraint sets, task counts).
//! - **goal_convergence** -- the judge's qualitative direction signals.
//!
//! All components live in [0, 1]; the overall value is a convex
//! combination rounded to two decimals.

use serde::{Deserialize, Serialize};

/// Lower band edge for the `Converging` status.
pub const CONVERGING_THRESHOLD: f64 = 0.70;

/// Weights for the stability composition. Must sum to 1.0, which is
/// asserted when the tracker is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityWeights {
    /// Weight on the inverted contradiction ratio. Default: 0.30.
    pub contradiction: f64,
    /// Weight on the decision reuse rate. Default: 0.25.
    pub reuse: f64,
    /// Weight on structural plan similarity. Default: 0.25.
    pub similarity: f64,
    /// Weight on goal convergence. Default: 0.20.
    pub goal: f64,
}

impl StabilityWeights {
    pub fn sum(&self) -> f64 {
        self.contradiction + self.reuse + self.similarity + self.goal
    }
}

impl Default for StabilityWeights {
    fn default() -> Self {
        Self {
            contradiction: 0.30,
            reuse: 0.25,
            similarity: 0.25,
            goal: 0.20,
        }
    }
}

/// Computed stability signals for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetrics {
    pub contradiction_ratio: f64,
    pub decision_reuse_rate: f64,
    pub plan_similarity: f64,
    pub goal_convergence: f64,
    /// Convex combination of the four signals, rounded to two decimals.
    pub overall_stability: f64,
}

/// Qualitative band for an overall stability value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityStatus {
    Stable,
    Converging,
    Unstable,
}

impl StabilityStatus {
    /// Band an overall stability value against the auto-terminate
    /// threshold (default 0.85).
    pub fn for_value(overall: f64, auto_terminate_threshold: f64) -> Self {
        if overall >= auto_terminate_threshold {
            Self::Stable
        } else if overall >= CONVERGING_THRESHOLD {
            Self::Converging
        } else {
            Self::Unstable
        }
    }
}

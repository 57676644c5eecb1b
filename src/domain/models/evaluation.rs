//! Blind evaluation model.
//!
//! A blind evaluation is a qualitative judgment of a plan expressed only
//! as enums and string lists. No numeric field exists on the type: the
//! evaluated model is never asked for a score and none is parsed even if
//! present, so the evaluation cannot be gamed through score inflation.

use serde::{Deserialize, Serialize};

/// Maximum entries retained per evaluation list field.
pub const EVALUATION_LIST_CAP: usize = 10;

/// Comparison of the current plan against the previous round's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VsPrevious {
    Better,
    Same,
    Worse,
}

impl VsPrevious {
    /// Parse from model output; unrecognized values return `None` and the
    /// caller falls back to the neutral middle.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "better" => Some(Self::Better),
            "same" => Some(Self::Same),
            "worse" => Some(Self::Worse),
            _ => None,
        }
    }

    /// Signal strength for stability composition: better 1.0, same 0.5,
    /// worse 0.0.
    pub fn signal(self) -> f64 {
        match self {
            Self::Better => 1.0,
            Self::Same => 0.5,
            Self::Worse => 0.0,
        }
    }
}

impl Default for VsPrevious {
    fn default() -> Self {
        Self::Same
    }
}

/// Comparison of the current plan's distance to the user goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VsGoal {
    Closer,
    Same,
    Farther,
}

impl VsGoal {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "closer" => Some(Self::Closer),
            "same" => Some(Self::Same),
            "farther" => Some(Self::Farther),
            _ => None,
        }
    }

    /// Signal strength for stability composition: closer 1.0, same 0.5,
    /// farther 0.0.
    pub fn signal(self) -> f64 {
        match self {
            Self::Closer => 1.0,
            Self::Same => 0.5,
            Self::Farther => 0.0,
        }
    }
}

impl Default for VsGoal {
    fn default() -> Self {
        Self::Same
    }
}

/// Qualitative judgment of one plan, produced by the blind judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlindEvaluation {
    pub vs_previous: VsPrevious,
    pub vs_goal: VsGoal,
    pub contradictions: Vec<String>,
    pub missing: Vec<String>,
    pub risks: Vec<String>,
}

impl BlindEvaluation {
    /// The substitute used when model output cannot be parsed. Deliberately
    /// pessimistic: it records one contradiction and one risk so that an
    /// unparseable evaluation can never satisfy the task-complete rule.
    pub fn conservative_default() -> Self {
        Self {
            vs_previous: VsPrevious::Same,
            vs_goal: VsGoal::Same,
            contradictions: vec!["Evaluation parsing failed".to_string()],
            missing: Vec::new(),
            risks: vec!["Unable to properly evaluate plan".to_string()],
        }
    }

    /// True when the evaluation reports nothing missing and no
    /// contradictions, the precondition for task-complete termination.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.contradictions.is_empty()
    }
}

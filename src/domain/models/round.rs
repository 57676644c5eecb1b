//! Round and run state for the orchestrator.

use serde::{Deserialize, Serialize};

use super::decision::TerminationReason;
use super::evaluation::BlindEvaluation;
use super::plan::{LockedStructure, Plan};
use super::stability::StabilityMetrics;

/// Phase of a planning round. Exactly one round per run is `Architect`:
/// the first, whose plan establishes the locked structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundPhase {
    Architect,
    Refiner,
}

/// State of a single round. Fields fill in as the round progresses
/// through plan generation, evaluation, and stability measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub number: u32,
    pub phase: RoundPhase,
    pub plan: Option<Plan>,
    pub evaluation: Option<BlindEvaluation>,
    pub stability: Option<StabilityMetrics>,
    pub locked_structure: Option<LockedStructure>,
}

impl RoundState {
    /// The zero state before any round has started. `number` is 0 so the
    /// orchestrator knows nothing needs archiving.
    pub fn initial() -> Self {
        Self {
            number: 0,
            phase: RoundPhase::Architect,
            plan: None,
            evaluation: None,
            stability: None,
            locked_structure: None,
        }
    }
}

/// Full run state owned by the orchestrator for the duration of one
/// `execute` call. Snapshots are cloned out through `get_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub goal: String,
    pub context: String,
    pub current_round: RoundState,
    /// Completed rounds, archived in order. The terminal round stays in
    /// `current_round`.
    pub round_history: Vec<RoundState>,
    pub is_running: bool,
    pub last_result: Option<ExecutionResult>,
}

impl OrchestratorState {
    pub fn new(goal: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            context: context.into(),
            current_round: RoundState::initial(),
            round_history: Vec::new(),
            is_running: false,
            last_result: None,
        }
    }
}

/// The outcome of a completed (or failed) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Human-readable summary, or the error message on failure.
    pub output: String,
    /// Number of the round the run ended on.
    pub round: u32,
    /// Last computed overall stability, or 0.0 if none was computed.
    pub stability: f64,
    pub terminated: bool,
    pub termination_reason: TerminationReason,
}

//! Execution observer port.
//!
//! The orchestrator emits progress through these hooks rather than
//! returning a lazy sequence, which keeps the round loop
//! synchronous-in-shape and testable by capturing hook invocations.
//! Implementations must not panic and must not mutate the supplied
//! objects (they receive shared references).

use serde::{Deserialize, Serialize};

use crate::domain::models::{ExecutionResult, RoundState};

/// Category of a structured log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Ordinary progress through the round sequence.
    Progress,
    /// A refined plan violated the locked structure. Non-fatal.
    LockingViolation,
    /// The blind judge raised an advisory concern about the evaluation
    /// history.
    Concern,
    /// The decision validator flagged a termination decision. Non-fatal.
    DecisionWarning,
    /// The run is ending abnormally.
    Failure,
}

/// A structured log event emitted once per notable step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub kind: LogKind,
    pub message: String,
    /// Optional structured payload (round numbers, violation details).
    pub data: Option<serde_json::Value>,
}

impl LogEvent {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Lifecycle hooks for one planning run. All methods default to no-ops so
/// observers implement only what they need.
pub trait ExecutionObserver: Send + Sync {
    /// A round has been started (number and phase are set; no plan yet).
    fn on_round_start(&self, _round: &RoundState) {}

    /// A round has completed evaluation and decision.
    fn on_round_complete(&self, _round: &RoundState) {}

    /// The run has ended, successfully or not.
    fn on_terminate(&self, _result: &ExecutionResult) {}

    /// A structured log event was emitted.
    fn on_log(&self, _event: &LogEvent) {}
}

/// Observer that ignores everything. Used when the host installs no hooks.
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_builder() {
        let event = LogEvent::new(LogKind::LockingViolation, "Locked goal removed: \"B\"")
            .with_data(serde_json::json!({ "round": 2 }));
        assert_eq!(event.kind, LogKind::LockingViolation);
        assert!(event.message.contains("\"B\""));
        assert_eq!(event.data.unwrap()["round"], 2);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&LogKind::LockingViolation).unwrap(),
            "\"locking_violation\""
        );
        assert_eq!(
            serde_json::to_string(&LogKind::DecisionWarning).unwrap(),
            "\"decision_warning\""
        );
    }

    #[test]
    fn test_noop_observer_accepts_everything() {
        let observer = NoopObserver;
        observer.on_log(&LogEvent::new(LogKind::Progress, "round 1"));
        // No panic, nothing recorded.
    }
}

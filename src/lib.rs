//! Parley - convergent multi-round planning core.
//!
//! Drives rounds of plan generation and blind evaluation against an
//! injected model client until a prioritized termination rule fires:
//!
//! - **domain**: data model (plans, evaluations, stability, decisions,
//!   round state), error taxonomy, and the two ports the host implements
//!   (`ModelClient`, `ExecutionObserver`)
//! - **services**: plan and evaluation parsers, similarity kernels,
//!   planner and blind-judge prompt builders, stability tracker, decision
//!   engine, and the orchestrator that sequences them
//! - **infrastructure**: `tracing` logging bootstrap

pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::{CoreError, CoreResult};
pub use domain::models::{
    BlindEvaluation, ExecutionResult, LockedStructure, OrchestratorState, Plan, PlanTask,
    RoundPhase, RoundState, StabilityMetrics, StabilityStatus, TaskPriority, TerminationDecision,
    TerminationReason,
};
pub use domain::ports::{model_fn, ExecutionObserver, LogEvent, LogKind, ModelClient, ModelError};
pub use services::{Config, ConfigError, Orchestrator, OrchestratorConfig};

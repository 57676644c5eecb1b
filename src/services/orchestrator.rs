//! Orchestrator: the single-run round state machine.
//!
//! One `execute` call drives the full loop: start a round, generate a
//! plan (architect on round 1, refiner after), lock the structure once,
//! evaluate blindly, measure stability, and decide. The loop only exits
//! through a termination decision or an unrecoverable error; there is no
//! other path out.
//!
//! Everything is strictly sequential. The two model calls per round are
//! the only suspension points, and the orchestrator owns its state
//! exclusively while running. Progress is emitted through the
//! [`ExecutionObserver`] hooks and mirrored to `tracing`.

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::json;

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{
    BlindEvaluation, ExecutionResult, LockedStructure, OrchestratorState, Plan, RoundPhase,
    RoundState, StabilityMetrics, StabilityStatus, TerminationDecision, TerminationReason,
};
use crate::domain::ports::{ExecutionObserver, LogEvent, LogKind, ModelClient, NoopObserver};
use crate::services::config::OrchestratorConfig;
use crate::services::decision_engine::DecisionEngine;
use crate::services::evaluation_parser::parse_evaluation;
use crate::services::judge::BlindJudge;
use crate::services::plan_parser::parse_plan;
use crate::services::planner::Planner;
use crate::services::stability_tracker::StabilityTracker;

/// Drives planning rounds against an injected model client until a
/// termination rule fires.
pub struct Orchestrator {
    model: Arc<dyn ModelClient>,
    observer: Arc<dyn ExecutionObserver>,
    planner: Planner,
    judge: BlindJudge,
    tracker: StabilityTracker,
    engine: DecisionEngine,
    config: OrchestratorConfig,
    state: OrchestratorState,
}

impl Orchestrator {
    /// Create an orchestrator with no observer hooks installed.
    pub fn new(model: Arc<dyn ModelClient>, config: OrchestratorConfig) -> Self {
        Self::with_observer(model, config, Arc::new(NoopObserver))
    }

    /// Create an orchestrator that reports progress through `observer`.
    pub fn with_observer(
        model: Arc<dyn ModelClient>,
        config: OrchestratorConfig,
        observer: Arc<dyn ExecutionObserver>,
    ) -> Self {
        Self {
            model,
            observer,
            planner: Planner::new(),
            judge: BlindJudge::new(),
            tracker: StabilityTracker::new(),
            engine: DecisionEngine::new(config.clone()),
            config,
            state: OrchestratorState::new("", ""),
        }
    }

    /// Read-only snapshot of the run state.
    pub fn get_state(&self) -> OrchestratorState {
        self.state.clone()
    }

    /// Run the full planning loop for `goal`.
    ///
    /// Model and plan-parse failures bubble as `Err`; before they do, the
    /// run is marked failed and [`OrchestratorState::last_result`] is set
    /// to a failure result carrying the max-rounds sentinel reason.
    pub async fn execute(&mut self, goal: &str, context: &str) -> CoreResult<ExecutionResult> {
        self.state = OrchestratorState::new(goal, context);
        self.state.is_running = true;
        tracing::info!(goal, max_rounds = self.config.max_rounds, "planning run started");

        loop {
            // 1. Start a new round, archiving the previous one.
            self.start_round();
            self.observer.on_round_start(&self.state.current_round);
            self.emit_progress(format!(
                "Round {} started ({} phase)",
                self.state.current_round.number,
                phase_name(self.state.current_round.phase),
            ));

            // 2. Generate the plan.
            let plan_prompt = self.build_plan_prompt();
            let plan_text = match self.model.complete(&plan_prompt).await {
                Ok(text) => text,
                Err(e) => return self.fail(e.into()),
            };
            let plan = match parse_plan(&plan_text) {
                Ok(plan) => plan,
                Err(e) => return self.fail(e),
            };
            self.emit_progress(format!(
                "Plan generated: {} goal(s), {} task(s), {} constraint(s)",
                plan.goals.len(),
                plan.tasks.len(),
                plan.constraints.len(),
            ));

            // Refined plans are checked against the lock; violations are
            // logged and the round continues.
            if self.state.current_round.phase == RoundPhase::Refiner {
                if let Some(locked) = self.state.current_round.locked_structure.clone() {
                    for violation in self.planner.validate_against_lock(&plan, &locked) {
                        tracing::warn!(
                            round = self.state.current_round.number,
                            %violation,
                            "locking violation"
                        );
                        self.emit_log(
                            LogEvent::new(LogKind::LockingViolation, violation)
                                .with_data(json!({ "round": self.state.current_round.number })),
                        );
                    }
                }
            }

            // 3. Round 1 locks the structure.
            if self.state.current_round.number == 1 {
                let locked = LockedStructure::from_plan(&plan, 1);
                self.emit_progress(format!(
                    "Structure locked: {} goal(s), {} core decision(s)",
                    locked.goals.len(),
                    locked.core_decisions.len(),
                ));
                self.state.current_round.locked_structure = Some(locked);
            }
            self.state.current_round.plan = Some(plan.clone());

            // 4. Blind evaluation. The parser never fails; only the model
            // call itself can end the run here.
            let eval_prompt = self.build_evaluation_prompt(&plan);
            let eval_text = match self.model.complete(&eval_prompt).await {
                Ok(text) => text,
                Err(e) => return self.fail(e.into()),
            };
            let evaluation = parse_evaluation(&eval_text);
            self.state.current_round.evaluation = Some(evaluation.clone());
            self.emit_progress(format!(
                "Evaluation: vs_previous={:?}, vs_goal={:?}, {} contradiction(s), {} missing, {} risk(s)",
                evaluation.vs_previous,
                evaluation.vs_goal,
                evaluation.contradictions.len(),
                evaluation.missing.len(),
                evaluation.risks.len(),
            ));
            self.emit_concerns(&evaluation);

            // 5. Stability against the previous archived round.
            let previous_plan = self.state.round_history.last().and_then(|r| r.plan.as_ref());
            let stability = self.tracker.compute(&plan, previous_plan, &evaluation);
            self.state.current_round.stability = Some(stability.clone());
            self.emit_progress(format!(
                "Stability {:.2} ({:?})",
                stability.overall_stability,
                StabilityStatus::for_value(
                    stability.overall_stability,
                    self.config.stability_threshold
                ),
            ));

            // 6. Decide.
            let decision = self.engine.decide(
                &self.state.current_round,
                &self.state.round_history,
                &evaluation,
                &stability,
            );
            for warning in self.engine.validate_decision(&decision, &evaluation) {
                tracing::warn!(
                    round = self.state.current_round.number,
                    warning = %warning.message,
                    "decision warning"
                );
                self.emit_log(LogEvent::new(LogKind::DecisionWarning, warning.message));
            }

            self.observer.on_round_complete(&self.state.current_round);

            if decision.should_terminate {
                return Ok(self.finish(&plan, &stability, decision));
            }
            self.emit_progress(format!(
                "Round {} complete, continuing (confidence {:.2})",
                self.state.current_round.number, decision.confidence,
            ));
        }
    }

    /// Archive the finished round (if any) and set up the next one. The
    /// locked structure carries forward unchanged once set.
    fn start_round(&mut self) {
        if self.state.current_round.number > 0 {
            self.state.round_history.push(self.state.current_round.clone());
        }
        let number = self.state.current_round.number + 1;
        let locked_structure = self.state.current_round.locked_structure.clone();
        self.state.current_round = RoundState {
            number,
            phase: if number == 1 {
                RoundPhase::Architect
            } else {
                RoundPhase::Refiner
            },
            plan: None,
            evaluation: None,
            stability: None,
            locked_structure,
        };
    }

    fn build_plan_prompt(&self) -> String {
        match self.state.current_round.phase {
            RoundPhase::Architect => self
                .planner
                .architect_prompt(&self.state.goal, &self.state.context),
            RoundPhase::Refiner => {
                let previous = self.state.round_history.last().and_then(|r| r.plan.as_ref());
                let locked = self.state.current_round.locked_structure.as_ref();
                match (previous, locked) {
                    (Some(previous), Some(locked)) => self.planner.refiner_prompt(
                        &self.state.goal,
                        &self.state.context,
                        previous,
                        locked,
                    ),
                    // The state machine sets both before any refiner round.
                    _ => unreachable!("refiner round without previous plan and locked structure"),
                }
            }
        }
    }

    fn build_evaluation_prompt(&self, plan: &Plan) -> String {
        let previous = self.state.round_history.last().and_then(|r| r.plan.as_ref());
        let locked = self.state.current_round.locked_structure.as_ref();
        self.judge
            .evaluation_prompt(plan, previous, &self.state.goal, locked)
    }

    /// Run the judge's advisory pattern detection over the full
    /// evaluation history and log what it finds.
    fn emit_concerns(&self, current: &BlindEvaluation) {
        let mut history: Vec<BlindEvaluation> = self
            .state
            .round_history
            .iter()
            .filter_map(|r| r.evaluation.clone())
            .collect();
        history.push(current.clone());

        for concern in self.judge.detect_concerns(&history) {
            tracing::warn!(
                severity = ?concern.severity,
                message = %concern.message,
                "judge concern"
            );
            self.emit_log(
                LogEvent::new(LogKind::Concern, concern.message)
                    .with_data(json!({ "severity": concern.severity })),
            );
        }
    }

    fn finish(
        &mut self,
        plan: &Plan,
        stability: &StabilityMetrics,
        decision: TerminationDecision,
    ) -> ExecutionResult {
        let result = ExecutionResult {
            success: decision.reason.is_success(),
            output: render_summary(
                &self.state.goal,
                plan,
                &decision,
                self.state.current_round.number,
                stability,
            ),
            round: self.state.current_round.number,
            stability: stability.overall_stability,
            terminated: true,
            termination_reason: decision.reason,
        };
        tracing::info!(
            round = result.round,
            reason = %decision.reason,
            stability = result.stability,
            success = result.success,
            "planning run terminated"
        );
        self.state.is_running = false;
        self.state.last_result = Some(result.clone());
        self.observer.on_terminate(&result);
        result
    }

    /// Record the failure sentinel, then bubble the error to the caller.
    fn fail(&mut self, error: CoreError) -> CoreResult<ExecutionResult> {
        let stability = self
            .state
            .current_round
            .stability
            .as_ref()
            .or_else(|| {
                self.state
                    .round_history
                    .last()
                    .and_then(|r| r.stability.as_ref())
            })
            .map(|s| s.overall_stability)
            .unwrap_or(0.0);

        let result = ExecutionResult {
            success: false,
            output: format!("Execution failed: {error}"),
            round: self.state.current_round.number,
            stability,
            terminated: true,
            termination_reason: TerminationReason::MaxRoundsReached,
        };
        tracing::error!(round = result.round, %error, "planning run failed");
        self.emit_log(LogEvent::new(LogKind::Failure, result.output.clone()));
        self.state.is_running = false;
        self.state.last_result = Some(result.clone());
        self.observer.on_terminate(&result);
        Err(error)
    }

    fn emit_progress(&self, message: String) {
        tracing::debug!(round = self.state.current_round.number, "{message}");
        self.emit_log(LogEvent::new(LogKind::Progress, message));
    }

    fn emit_log(&self, event: LogEvent) {
        self.observer.on_log(&event);
    }
}

fn phase_name(phase: RoundPhase) -> &'static str {
    match phase {
        RoundPhase::Architect => "architect",
        RoundPhase::Refiner => "refiner",
    }
}

/// Human-readable run summary for [`ExecutionResult::output`].
fn render_summary(
    goal: &str,
    plan: &Plan,
    decision: &TerminationDecision,
    round: u32,
    stability: &StabilityMetrics,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Goal: {goal}");
    let _ = writeln!(
        out,
        "Terminated after round {round}: {} (confidence {:.2})",
        decision.reason, decision.confidence
    );
    let _ = writeln!(out, "Overall stability: {:.2}", stability.overall_stability);
    let _ = writeln!(out);
    let _ = writeln!(out, "Plan goals:");
    for goal in &plan.goals {
        let _ = writeln!(out, "  - {goal}");
    }
    let _ = writeln!(out, "Constraints:");
    for constraint in &plan.constraints {
        let _ = writeln!(out, "  - {constraint}");
    }
    let _ = writeln!(out, "Tasks:");
    for (index, task) in plan.tasks.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. [{:?}] {}",
            index + 1,
            task.priority,
            task.description
        );
    }
    out
}

//! Shared fixtures for the integration tests: a scripted model client, a
//! recording observer, and JSON builders for model responses.

// Not every test target uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use parley::{
    ExecutionObserver, ExecutionResult, LogEvent, ModelClient, ModelError, RoundState,
};

/// Model client that replays a fixed queue of canned responses and
/// records every prompt it receives.
pub struct ScriptedModelClient {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModelClient {
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModelError::Failed("scripted responses exhausted".to_string()))
    }
}

/// Observer that records every hook invocation for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    round_starts: Mutex<Vec<u32>>,
    round_completes: Mutex<Vec<RoundState>>,
    results: Mutex<Vec<ExecutionResult>>,
    logs: Mutex<Vec<LogEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_starts(&self) -> Vec<u32> {
        self.round_starts.lock().unwrap().clone()
    }

    pub fn round_completes(&self) -> Vec<RoundState> {
        self.round_completes.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<ExecutionResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<LogEvent> {
        self.logs.lock().unwrap().clone()
    }
}

impl ExecutionObserver for RecordingObserver {
    fn on_round_start(&self, round: &RoundState) {
        self.round_starts.lock().unwrap().push(round.number);
    }

    fn on_round_complete(&self, round: &RoundState) {
        self.round_completes.lock().unwrap().push(round.clone());
    }

    fn on_terminate(&self, result: &ExecutionResult) {
        self.results.lock().unwrap().push(result.clone());
    }

    fn on_log(&self, event: &LogEvent) {
        self.logs.lock().unwrap().push(event.clone());
    }
}

/// Build a plan response the way a cooperative model would answer the
/// architect or refiner prompt. Tasks are `(description, priority)` pairs.
pub fn plan_json(goals: &[&str], tasks: &[(&str, &str)], constraints: &[&str]) -> String {
    let tasks: Vec<serde_json::Value> = tasks
        .iter()
        .map(|(description, priority)| {
            serde_json::json!({
                "description": description,
                "priority": priority,
                "dependencies": []
            })
        })
        .collect();
    serde_json::json!({
        "goals": goals,
        "tasks": tasks,
        "constraints": constraints
    })
    .to_string()
}

/// Build a blind-evaluation response.
pub fn eval_json(
    vs_previous: &str,
    vs_goal: &str,
    contradictions: &[&str],
    missing: &[&str],
    risks: &[&str],
) -> String {
    serde_json::json!({
        "vs_previous": vs_previous,
        "vs_goal": vs_goal,
        "contradictions": contradictions,
        "missing": missing,
        "risks": risks
    })
    .to_string()
}

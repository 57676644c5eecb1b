//! Domain errors for the parley planning core.

use thiserror::Error;

use crate::domain::ports::model_client::ModelError;

/// Unrecoverable errors that end a planning run.
///
/// Recoverable signals (lock violations, decision warnings, unparseable
/// evaluations) are not errors: they are logged or substituted and the
/// round continues.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("model call failed: {0}")]
    ModelCall(#[from] ModelError),

    #[error("failed to parse plan from model output: {0}")]
    PlanParse(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

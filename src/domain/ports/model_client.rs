//! Model client port.
//!
//! The planning core's single injected dependency: a prompt goes in, the
//! completed response text comes out. The core makes no assumption about
//! which provider answers, and consumes only full responses; streaming,
//! retries, backoff, rate limits, and provider fallback are the host's
//! concern. A host wanting cancellation arranges for the client to fail
//! (e.g. via a deadline); the core treats that failure as run-ending.

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

/// Errors a model client may surface. The orchestrator does not retry;
/// any of these ends the run.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("model call timed out after {0}s")]
    Timeout(u64),

    #[error("model call cancelled by host")]
    Cancelled,

    #[error("model call failed: {0}")]
    Failed(String),
}

/// Port trait for the injected model function.
///
/// Implementations must be `Send + Sync`; the orchestrator issues at most
/// one call at a time.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Complete a prompt and return the full response text.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Adapter that lets a plain async closure serve as a [`ModelClient`], so
/// hosts can inject `callModel` as a function rather than a type.
pub struct FnModelClient<F> {
    f: F,
}

/// Wrap an async closure as a [`ModelClient`].
///
/// ```ignore
/// let client = model_fn(|prompt| async move { Ok(answer_for(&prompt)) });
/// ```
pub fn model_fn<F, Fut>(f: F) -> FnModelClient<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ModelError>> + Send,
{
    FnModelClient { f }
}

#[async_trait]
impl<F, Fut> ModelClient for FnModelClient<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ModelError>> + Send,
{
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        (self.f)(prompt.to_string()).await
    }
}

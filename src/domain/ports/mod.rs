//! Ports: the traits the host implements to drive the planning core.

pub mod model_client;
pub mod observer;

pub use model_client::{model_fn, FnModelClient, ModelClient, ModelError};
pub use observer::{ExecutionObserver, LogEvent, LogKind, NoopObserver};

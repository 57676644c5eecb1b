//! Logging infrastructure: configuration and `tracing` bootstrap.

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::Logger;

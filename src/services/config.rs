//! Configuration for the parley planning core.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::infrastructure::logging::LogConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
    #[error("Failed to read configuration: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed for {field}: {reason}")]
    ValidationError { field: String, reason: String },
}

/// Top-level configuration: orchestration limits plus logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub orchestrator: OrchestratorConfig,
    pub logging: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orchestrator.validate()
    }
}

/// Limits and thresholds for one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Hard upper bound on rounds.
    pub max_rounds: u32,
    /// Overall stability at or above this triggers stability termination.
    pub stability_threshold: f64,
    /// Consecutive `farther` judgments that trigger divergence termination.
    pub goal_divergence_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            stability_threshold: 0.85,
            goal_divergence_limit: 2,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::ValidationError {
                field: "orchestrator.max_rounds".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.stability_threshold) {
            return Err(ConfigError::ValidationError {
                field: "orchestrator.stability_threshold".to_string(),
                reason: format!("must be in [0, 1], got {}", self.stability_threshold),
            });
        }
        Ok(())
    }
}

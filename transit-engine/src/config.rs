//! Executor configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via TRANSIT_CONFIG)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How per-entity mutation failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole run on the first `apply` failure. Mutations already
    /// persisted stand; there is no rollback.
    #[default]
    FailFast,
    /// Record the failure in the report and proceed with the next entity.
    Continue,
}

/// Executor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Failure handling for per-entity mutations.
    pub failure_policy: FailurePolicy,

    /// When set, a rule that reports its storage-level filter as precise
    /// skips the per-entity predicate in bulk runs. Off by default: the
    /// predicate runs for every loaded entity.
    pub trust_narrowing: bool,
}

impl ExecutorConfig {
    /// Loads configuration from file (if TRANSIT_CONFIG is set), then
    /// applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Ok(path) = std::env::var("TRANSIT_CONFIG") {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: ExecutorConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(policy) = std::env::var("TRANSIT_FAILURE_POLICY") {
            match policy.to_lowercase().as_str() {
                "fail_fast" | "failfast" => self.failure_policy = FailurePolicy::FailFast,
                "continue" => self.failure_policy = FailurePolicy::Continue,
                other => {
                    tracing::warn!(
                        value = other,
                        "unrecognized TRANSIT_FAILURE_POLICY, keeping current policy"
                    );
                }
            }
        }

        if let Ok(trust) = std::env::var("TRANSIT_TRUST_NARROWING") {
            self.trust_narrowing = trust == "1" || trust.to_lowercase() == "true";
        }
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}", path = .0.display(), source = .1)]
    Io(PathBuf, std::io::Error),

    #[error("failed to parse config file '{path}': {reason}", path = .0.display(), reason = .1)]
    Parse(PathBuf, String),
}

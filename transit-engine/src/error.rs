//! Engine error types.

use crate::config::ConfigError;
use thiserror::Error;
use transit_core::RuleError;
use transit_entity::StoreError;

/// Errors from a transition run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("query failed for rule '{rule}': {source}")]
    Query {
        rule: String,
        #[source]
        source: StoreError,
    },

    #[error("loading candidates failed for rule '{rule}': {source}")]
    Load {
        rule: String,
        #[source]
        source: StoreError,
    },

    #[error("rule '{rule}' failed on {entity_type}/{entity_id} ({langcode}): {source}")]
    Apply {
        rule: String,
        entity_type: String,
        entity_id: String,
        langcode: String,
        #[source]
        source: RuleError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error_converts() {
        let source = ConfigError::Parse(PathBuf::from("transit.yaml"), "bad yaml".to_string());
        let err = EngineError::from(source);
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("transit.yaml"));
    }
}

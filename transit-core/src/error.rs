//! Core error types.

use thiserror::Error;

/// Errors from definition validation and registry construction.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid transition definition: {reason}")]
    InvalidDefinition { reason: String },

    #[error("duplicate transition rule: {id}")]
    DuplicateRule { id: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a transition rule's mutation.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("store error: {0}")]
    Store(#[from] transit_entity::StoreError),

    #[error("rule failed: {reason}")]
    Failed { reason: String },
}

impl RuleError {
    /// Shorthand for a domain-level failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

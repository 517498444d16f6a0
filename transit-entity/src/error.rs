//! Store error types.

use thiserror::Error;

/// Errors from an entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {entity_type}/{id} ({langcode})")]
    EntityNotFound {
        entity_type: String,
        id: String,
        langcode: String,
    },

    #[error("store backend error: {reason}")]
    Backend { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

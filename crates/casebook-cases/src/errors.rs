//! Case error types.
//!
//! Errors are not fail-silent; the HTTP layer maps each variant onto a
//! status code.

use thiserror::Error;

/// Errors from case operations.
#[derive(Debug, Error)]
pub enum CaseError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type (e.g., "Case", "Workflow step").
        entity: &'static str,
        /// The ID that was looked up.
        id: String,
    },

    /// Validation failure.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CaseError {
    /// Create a not-found error for a case.
    pub fn case_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Case",
            id: id.into(),
        }
    }

    /// Create a not-found error for a workflow step.
    pub fn step_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Workflow step",
            id: id.into(),
        }
    }

    /// Create a not-found error for a milestone.
    pub fn milestone_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Milestone",
            id: id.into(),
        }
    }

    /// Create a not-found error for a user.
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "User",
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for CaseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

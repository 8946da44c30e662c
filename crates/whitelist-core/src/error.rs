//! Domain error types.

use thiserror::Error;

use crate::model::ApplicationStatus;

/// Top-level domain error type.
///
/// `Validation`, `Conflict` and `InvalidTransition` are expected outcomes
/// that callers report back to the acting user. `NotFound` also covers a
/// lost race between read and write; the caller should re-fetch and retry.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Submitted data has the wrong shape.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The submitter already has an active application.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested action is not legal from the record's current status.
    #[error("cannot {action} application {application_id} while it is {status}")]
    InvalidTransition {
        /// The application the action targeted.
        application_id: i64,
        /// The status the record was in.
        status: ApplicationStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// The application does not exist, or no longer exists in the state the
    /// action was validated against.
    #[error("application {0} not found in the expected state; refresh and retry")]
    NotFound(i64),

    /// An external collaborator failed.
    #[error("dependency error: {0}")]
    Dependency(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a field-specific validation failure.
    #[must_use]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

//! Status notification port.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DomainError;
use crate::model::{Application, ApplicationStatus};

/// Message sent to a submitter after an administrator decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusNotification {
    /// The decided application.
    pub application_id: i64,
    /// Recipient.
    pub submitter_id: i64,
    /// Status after the decision.
    pub status: ApplicationStatus,
    /// Administrator comment, if any.
    pub comment: Option<String>,
    /// Deciding administrator.
    pub decided_by: Option<i64>,
}

impl From<&Application> for StatusNotification {
    fn from(application: &Application) -> Self {
        Self {
            application_id: application.id,
            submitter_id: application.submitter_id,
            status: application.status,
            comment: application.admin_comment.clone(),
            decided_by: application.decided_by,
        }
    }
}

/// Delivers status notifications to submitters. Best-effort: a failure is
/// logged by the caller and never undoes the decision.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    /// Sends one notification.
    async fn notify(&self, notification: &StatusNotification) -> Result<(), DomainError>;
}

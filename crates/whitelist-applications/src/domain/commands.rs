//! Commands accepted by the lifecycle engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use whitelist_core::error::DomainError;
use whitelist_core::model::ApplicationStatus;

/// Raw profile data as typed by the applicant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSubmission {
    /// Display name.
    pub display_name: String,
    /// In-game identifier.
    pub game_identifier: String,
    /// Platform name, any casing.
    pub platform: String,
    /// Platform account id; required on PC.
    #[serde(default)]
    pub external_account_id: Option<String>,
}

/// Command to file a new application.
#[derive(Debug, Clone)]
pub struct SubmitApplication {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submitting chat user.
    pub submitter_id: i64,
    /// Submitted profile.
    pub profile: ProfileSubmission,
}

/// Command to re-queue a rejected or returned application.
#[derive(Debug, Clone)]
pub struct ResubmitApplication {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The application to re-queue.
    pub application_id: i64,
    /// The chat user re-submitting; must own the application.
    pub submitter_id: i64,
    /// Corrected profile.
    pub profile: ProfileSubmission,
}

/// An administrator's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Add to the whitelist.
    Approved,
    /// Decline.
    Rejected,
    /// Return to the submitter for corrections.
    NeedsFix,
}

impl Decision {
    /// Status the record moves to.
    #[must_use]
    pub fn status(self) -> ApplicationStatus {
        match self {
            Self::Approved => ApplicationStatus::Approved,
            Self::Rejected => ApplicationStatus::Rejected,
            Self::NeedsFix => ApplicationStatus::NeedsFix,
        }
    }

    /// Verb used in logs and errors.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Approved => "approve",
            Self::Rejected => "reject",
            Self::NeedsFix => "request_fix",
        }
    }
}

impl FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            "needs_fix" | "request_fix" => Ok(Self::NeedsFix),
            _ => Err(DomainError::validation(
                "decision",
                format!("unknown decision '{s}'; expected approved, rejected or needs_fix"),
            )),
        }
    }
}

/// Command to record an administrator decision.
#[derive(Debug, Clone)]
pub struct DecideApplication {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The application being decided.
    pub application_id: i64,
    /// The verdict.
    pub decision: Decision,
    /// Free-text rationale; ignored for approvals.
    pub comment: Option<String>,
    /// The deciding administrator, already authorised by the caller.
    pub decider_id: i64,
}

//! The application record and its value types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle status of a whitelist application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Sent back to the submitter for corrections.
    NeedsFix,
    /// Accepted onto the whitelist.
    Approved,
    /// Declined.
    Rejected,
}

impl ApplicationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::NeedsFix, Self::Approved, Self::Rejected];

    /// Stable storage/wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::NeedsFix => "needs_fix",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether further transitions are expected from this status. A
    /// submitter holds at most one record in an active status.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::NeedsFix)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::validation(
                    "status",
                    format!("unknown status '{s}'; expected pending, needs_fix, approved or rejected"),
                )
            })
    }
}

/// Gaming platform the applicant plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    /// PC (Steam).
    Pc,
    /// Xbox.
    Xbox,
    /// `PlayStation`.
    Ps,
}

impl Platform {
    /// Canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Xbox => "XBOX",
            Self::Ps => "PS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    /// Parses a platform name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PC" => Ok(Self::Pc),
            "XBOX" => Ok(Self::Xbox),
            "PS" => Ok(Self::Ps),
            _ => Err(DomainError::validation(
                "platform",
                format!("unknown platform '{}'; expected one of PC, XBOX, PS", s.trim()),
            )),
        }
    }
}

/// The validated, normalised profile payload of an application.
///
/// This is also the only patch shape a resubmission may apply: it has no
/// way to express `status`, `admin_comment` or `decided_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationProfile {
    /// Applicant's display name.
    pub display_name: String,
    /// Normalised in-game identifier.
    pub game_identifier: String,
    /// Platform the applicant plays on.
    pub platform: Platform,
    /// Normalised platform account id, if supplied.
    pub external_account_id: Option<String>,
}

impl ApplicationProfile {
    /// Checks the fields every stored record must carry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the display name or the game
    /// identifier is blank.
    pub fn ensure_required(&self) -> Result<(), DomainError> {
        if self.display_name.trim().is_empty() {
            return Err(DomainError::validation("display_name", "must not be empty"));
        }
        if self.game_identifier.trim().is_empty() {
            return Err(DomainError::validation("game_identifier", "must not be empty"));
        }
        Ok(())
    }
}

/// A whitelist application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Surrogate identifier, monotonically increasing and never reused.
    pub id: i64,
    /// Chat-platform identity of the submitter.
    pub submitter_id: i64,
    /// Applicant's display name.
    pub display_name: String,
    /// Normalised in-game identifier.
    pub game_identifier: String,
    /// Platform the applicant plays on.
    pub platform: Platform,
    /// Normalised platform account id, if supplied.
    pub external_account_id: Option<String>,
    /// Current lifecycle status.
    pub status: ApplicationStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
    /// Rationale recorded with the last administrator decision.
    pub admin_comment: Option<String>,
    /// Administrator who made the last decision.
    pub decided_by: Option<i64>,
}

impl Application {
    /// Returns the profile portion of the record.
    #[must_use]
    pub fn profile(&self) -> ApplicationProfile {
        ApplicationProfile {
            display_name: self.display_name.clone(),
            game_identifier: self.game_identifier.clone(),
            platform: self.platform,
            external_account_id: self.external_account_id.clone(),
        }
    }
}

/// Input to `ApplicationRepository::create`.
#[derive(Debug, Clone)]
pub struct NewApplication {
    /// Chat-platform identity of the submitter.
    pub submitter_id: i64,
    /// Validated profile payload.
    pub profile: ApplicationProfile,
    /// Creation time; also the initial `updated_at`.
    pub created_at: DateTime<Utc>,
}

/// A guarded status update.
///
/// The update only applies while the row is still in `expected`, which is
/// the status the transition was validated against.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Status the record must currently be in.
    pub expected: ApplicationStatus,
    /// New status.
    pub status: ApplicationStatus,
    /// Administrator comment to store (`None` clears it).
    pub admin_comment: Option<String>,
    /// Deciding administrator to store (`None` clears it).
    pub decided_by: Option<i64>,
    /// Mutation time.
    pub at: DateTime<Utc>,
}

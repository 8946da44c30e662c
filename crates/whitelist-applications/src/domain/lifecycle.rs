//! The application state machine.
//!
//! `check_transition` is the single legal-transition table; every mutating
//! handler consults it before touching storage.

use std::time::Duration;

use whitelist_core::error::DomainError;
use whitelist_core::model::ApplicationStatus;

use super::commands::Decision;

/// Comment stored with every approval.
pub const APPROVAL_COMMENT: &str = "User added to the whitelist";

/// Deployment-level lifecycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Whether administrators may send applications back with `needs_fix`.
    /// Disabling it only stops new `needs_fix` decisions; records already
    /// in that state stay actionable.
    pub needs_fix_enabled: bool,
    /// Whether an `approved` record may be decided again (e.g. demoted).
    pub redecide_approved: bool,
    /// Upper bound on a profile verification call.
    pub verification_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            needs_fix_enabled: true,
            redecide_approved: false,
            verification_timeout: Duration::from_secs(10),
        }
    }
}

/// A requested state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The submitter re-queues their application.
    Resubmit,
    /// An administrator decides.
    Decide(Decision),
}

impl Transition {
    /// Every transition, for computing what a record allows.
    pub const ALL: [Self; 4] = [
        Self::Resubmit,
        Self::Decide(Decision::Approved),
        Self::Decide(Decision::Rejected),
        Self::Decide(Decision::NeedsFix),
    ];

    /// Verb used in logs and errors.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Resubmit => "resubmit",
            Self::Decide(decision) => decision.action(),
        }
    }
}

/// Validates `transition` from `current` and returns the target status.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the transition is not legal
/// under `config`.
pub fn check_transition(
    config: &LifecycleConfig,
    application_id: i64,
    current: ApplicationStatus,
    transition: Transition,
) -> Result<ApplicationStatus, DomainError> {
    use whitelist_core::model::ApplicationStatus::{Approved, NeedsFix, Pending, Rejected};

    let allowed = match (transition, current) {
        (Transition::Resubmit, Rejected | NeedsFix) => true,
        (Transition::Resubmit, Pending | Approved) => false,
        (Transition::Decide(Decision::NeedsFix), _) if !config.needs_fix_enabled => false,
        (Transition::Decide(_), Pending | NeedsFix) => true,
        (Transition::Decide(decision), Approved) => {
            config.redecide_approved && decision != Decision::Approved
        }
        (Transition::Decide(_), Rejected) => false,
    };

    if !allowed {
        return Err(DomainError::InvalidTransition {
            application_id,
            status: current,
            action: transition.action(),
        });
    }

    Ok(match transition {
        Transition::Resubmit => Pending,
        Transition::Decide(decision) => decision.status(),
    })
}

/// Actions currently available on a record in `current`.
#[must_use]
pub fn available_actions(config: &LifecycleConfig, current: ApplicationStatus) -> Vec<&'static str> {
    Transition::ALL
        .into_iter()
        .filter(|t| check_transition(config, 0, current, *t).is_ok())
        .map(Transition::action)
        .collect()
}

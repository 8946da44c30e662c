//! Application repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::model::{
    Application, ApplicationProfile, ApplicationStatus, NewApplication, StatusChange,
};

/// Which identifier space a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// The in-game identifier.
    GameIdentifier,
    /// The platform account id.
    ExternalAccountId,
}

/// Durable storage of application records.
///
/// Every mutating method is atomic with respect to the single row it
/// touches. Methods returning `bool` report whether a row was affected;
/// `false` is an expected outcome (unknown id, or the row moved on since it
/// was read), never an error.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts a new `pending` record and returns its id.
    ///
    /// Returns `DomainError::Validation` if the display name or game
    /// identifier is blank, and `DomainError::Conflict` if the submitter
    /// already holds an active record.
    async fn create(&self, application: &NewApplication) -> Result<i64, DomainError>;

    /// Loads a record by id.
    async fn get_by_id(&self, id: i64) -> Result<Option<Application>, DomainError>;

    /// Loads the highest-id record of a submitter.
    async fn get_latest_by_submitter(
        &self,
        submitter_id: i64,
    ) -> Result<Option<Application>, DomainError>;

    /// Most recent record with the given normalised game identifier.
    async fn find_by_game_identifier(
        &self,
        game_identifier: &str,
    ) -> Result<Option<Application>, DomainError>;

    /// Most recent record with the given normalised external account id.
    async fn find_by_external_account_id(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Application>, DomainError>;

    /// Whether any `approved` record carries the normalised identifier.
    async fn has_approved(&self, kind: IdentifierKind, value: &str) -> Result<bool, DomainError>;

    /// Distinct game identifiers of approved records, ascending.
    async fn list_approved_game_identifiers(&self) -> Result<Vec<String>, DomainError>;

    /// Records newest-first, optionally filtered by status.
    async fn list_by_status(
        &self,
        status: Option<ApplicationStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Application>, DomainError>;

    /// Overwrites the profile fields of a record.
    async fn update_fields(
        &self,
        id: i64,
        profile: &ApplicationProfile,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Sets status, comment and decider together, guarded by
    /// `change.expected`.
    async fn update_status(&self, id: i64, change: &StatusChange) -> Result<bool, DomainError>;

    /// Re-queues a record: applies the profile patch, resets the status to
    /// `pending` and clears the comment and decider.
    ///
    /// The default claims the transition first and then patches the
    /// profile; implementations with transactions should do both at once.
    async fn resubmit(
        &self,
        id: i64,
        expected: ApplicationStatus,
        profile: &ApplicationProfile,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        profile.ensure_required()?;
        let change = StatusChange {
            expected,
            status: ApplicationStatus::Pending,
            admin_comment: None,
            decided_by: None,
            at,
        };
        if !self.update_status(id, &change).await? {
            return Ok(false);
        }
        self.update_fields(id, profile, at).await
    }
}

//! In-memory and failing `ApplicationRepository` implementations.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use whitelist_core::error::DomainError;
use whitelist_core::model::{
    Application, ApplicationProfile, ApplicationStatus, NewApplication, StatusChange,
};
use whitelist_core::repository::{ApplicationRepository, IdentifierKind};

#[derive(Debug, Default)]
struct Rows {
    applications: Vec<Application>,
    last_id: i64,
}

impl Rows {
    fn find_mut(&mut self, id: i64) -> Option<&mut Application> {
        self.applications.iter_mut().find(|a| a.id == id)
    }

    fn has_other_active(&self, submitter_id: i64, except: Option<i64>) -> bool {
        self.applications
            .iter()
            .any(|a| a.submitter_id == submitter_id && a.status.is_active() && Some(a.id) != except)
    }

    fn latest_where(&self, predicate: impl Fn(&Application) -> bool) -> Option<Application> {
        self.applications
            .iter()
            .filter(|a| predicate(a))
            .max_by_key(|a| a.id)
            .cloned()
    }
}

fn active_conflict() -> DomainError {
    DomainError::Conflict("submitter already has an active application".to_owned())
}

/// An in-memory repository that behaves like the SQLite store, including
/// the one-active-application-per-submitter rule. Uses the trait's default
/// two-step `resubmit`.
#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    rows: Mutex<Rows>,
}

impl InMemoryApplicationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored record, in id order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn all(&self) -> Vec<Application> {
        self.rows.lock().unwrap().applications.clone()
    }

    /// Inserts a record verbatim, bypassing every rule. Useful to seed a
    /// record in a specific status.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed(&self, application: Application) {
        let mut rows = self.rows.lock().unwrap();
        rows.last_id = rows.last_id.max(application.id);
        rows.applications.push(application);
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, application: &NewApplication) -> Result<i64, DomainError> {
        application.profile.ensure_required()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.has_other_active(application.submitter_id, None) {
            return Err(active_conflict());
        }
        rows.last_id += 1;
        let id = rows.last_id;
        let profile = application.profile.clone();
        rows.applications.push(Application {
            id,
            submitter_id: application.submitter_id,
            display_name: profile.display_name,
            game_identifier: profile.game_identifier,
            platform: profile.platform,
            external_account_id: profile.external_account_id,
            status: ApplicationStatus::Pending,
            created_at: application.created_at,
            updated_at: application.created_at,
            admin_comment: None,
            decided_by: None,
        });
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Application>, DomainError> {
        Ok(self.rows.lock().unwrap().latest_where(|a| a.id == id))
    }

    async fn get_latest_by_submitter(
        &self,
        submitter_id: i64,
    ) -> Result<Option<Application>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .latest_where(|a| a.submitter_id == submitter_id))
    }

    async fn find_by_game_identifier(
        &self,
        game_identifier: &str,
    ) -> Result<Option<Application>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .latest_where(|a| a.game_identifier == game_identifier))
    }

    async fn find_by_external_account_id(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Application>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .latest_where(|a| a.external_account_id.as_deref() == Some(external_account_id)))
    }

    async fn has_approved(&self, kind: IdentifierKind, value: &str) -> Result<bool, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.applications.iter().any(|a| {
            a.status == ApplicationStatus::Approved
                && match kind {
                    IdentifierKind::GameIdentifier => a.game_identifier == value,
                    IdentifierKind::ExternalAccountId => {
                        a.external_account_id.as_deref() == Some(value)
                    }
                }
        }))
    }

    async fn list_approved_game_identifiers(&self) -> Result<Vec<String>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let distinct: BTreeSet<String> = rows
            .applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Approved && !a.game_identifier.is_empty())
            .map(|a| a.game_identifier.clone())
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn list_by_status(
        &self,
        status: Option<ApplicationStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Application>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<Application> = rows
            .applications
            .iter()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update_fields(
        &self,
        id: i64,
        profile: &ApplicationProfile,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        profile.ensure_required()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(application) = rows.find_mut(id) else {
            return Ok(false);
        };
        application.display_name.clone_from(&profile.display_name);
        application.game_identifier.clone_from(&profile.game_identifier);
        application.platform = profile.platform;
        application
            .external_account_id
            .clone_from(&profile.external_account_id);
        application.updated_at = at;
        Ok(true)
    }

    async fn update_status(&self, id: i64, change: &StatusChange) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(submitter_id) = rows
            .applications
            .iter()
            .find(|a| a.id == id && a.status == change.expected)
            .map(|a| a.submitter_id)
        else {
            return Ok(false);
        };
        if change.status.is_active() && rows.has_other_active(submitter_id, Some(id)) {
            return Err(active_conflict());
        }
        if let Some(application) = rows.find_mut(id) {
            application.status = change.status;
            application.admin_comment.clone_from(&change.admin_comment);
            application.decided_by = change.decided_by;
            application.updated_at = change.at;
        }
        Ok(true)
    }
}

/// A repository whose every call fails with an infrastructure error.
#[derive(Debug)]
pub struct FailingApplicationRepository;

fn connection_refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

#[async_trait]
impl ApplicationRepository for FailingApplicationRepository {
    async fn create(&self, _application: &NewApplication) -> Result<i64, DomainError> {
        Err(connection_refused())
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Application>, DomainError> {
        Err(connection_refused())
    }

    async fn get_latest_by_submitter(
        &self,
        _submitter_id: i64,
    ) -> Result<Option<Application>, DomainError> {
        Err(connection_refused())
    }

    async fn find_by_game_identifier(
        &self,
        _game_identifier: &str,
    ) -> Result<Option<Application>, DomainError> {
        Err(connection_refused())
    }

    async fn find_by_external_account_id(
        &self,
        _external_account_id: &str,
    ) -> Result<Option<Application>, DomainError> {
        Err(connection_refused())
    }

    async fn has_approved(&self, _kind: IdentifierKind, _value: &str) -> Result<bool, DomainError> {
        Err(connection_refused())
    }

    async fn list_approved_game_identifiers(&self) -> Result<Vec<String>, DomainError> {
        Err(connection_refused())
    }

    async fn list_by_status(
        &self,
        _status: Option<ApplicationStatus>,
        _limit: u32,
        _offset: u32,
    ) -> Result<Vec<Application>, DomainError> {
        Err(connection_refused())
    }

    async fn update_fields(
        &self,
        _id: i64,
        _profile: &ApplicationProfile,
        _at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        Err(connection_refused())
    }

    async fn update_status(&self, _id: i64, _change: &StatusChange) -> Result<bool, DomainError> {
        Err(connection_refused())
    }
}

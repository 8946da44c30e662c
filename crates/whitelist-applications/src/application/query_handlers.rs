//! Query handlers for the lookup service.
//!
//! Read-only answers for the game server and the chat bot. Nothing here
//! mutates state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{instrument, warn};
use whitelist_core::error::DomainError;
use whitelist_core::identifier;
use whitelist_core::model::{Application, ApplicationStatus, Platform};
use whitelist_core::repository::{ApplicationRepository, IdentifierKind};
use whitelist_core::verifier::{GamePlaytime, ProfileVerifier};

use crate::domain::lifecycle::{LifecycleConfig, available_actions};

/// Page size used when a listing does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a listing may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Read-only view of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationView {
    /// Application id.
    pub id: i64,
    /// Submitting chat user.
    pub submitter_id: i64,
    /// Display name.
    pub display_name: String,
    /// Normalised in-game identifier.
    pub game_identifier: String,
    /// Platform.
    pub platform: Platform,
    /// Normalised platform account id.
    pub external_account_id: Option<String>,
    /// Current status.
    pub status: ApplicationStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Administrator comment from the last decision.
    pub admin_comment: Option<String>,
    /// Administrator who made the last decision.
    pub decided_by: Option<i64>,
    /// Actions the current status allows.
    pub available_actions: Vec<&'static str>,
}

impl ApplicationView {
    /// Builds a view, resolving the actions `config` allows.
    #[must_use]
    pub fn new(application: Application, config: &LifecycleConfig) -> Self {
        Self {
            available_actions: available_actions(config, application.status),
            id: application.id,
            submitter_id: application.submitter_id,
            display_name: application.display_name,
            game_identifier: application.game_identifier,
            platform: application.platform,
            external_account_id: application.external_account_id,
            status: application.status,
            created_at: application.created_at,
            updated_at: application.updated_at,
            admin_comment: application.admin_comment,
            decided_by: application.decided_by,
        }
    }
}

/// Whitelist status of an identifier plus its counterpart in the other
/// identifier space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierLookup {
    /// Some approved record carries the identifier.
    pub whitelisted: bool,
    /// Counterpart identifier from the most recent matching record, of any
    /// status.
    pub counterpart: Option<String>,
}

/// Checks whether `raw` is approved in one identifier space. Empty input is
/// never approved.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn is_approved_by(
    kind: IdentifierKind,
    raw: &str,
    repo: &dyn ApplicationRepository,
) -> Result<bool, DomainError> {
    let normalized = identifier::normalize(raw);
    if normalized.is_empty() {
        return Ok(false);
    }
    repo.has_approved(kind, &normalized).await
}

/// Checks whether `raw` is approved as either a game identifier or an
/// external account id.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn is_approved(raw: &str, repo: &dyn ApplicationRepository) -> Result<bool, DomainError> {
    Ok(is_approved_by(IdentifierKind::GameIdentifier, raw, repo).await?
        || is_approved_by(IdentifierKind::ExternalAccountId, raw, repo).await?)
}

/// External account id recorded with a game identifier, regardless of
/// status.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn resolve_external_account_id(
    game_identifier: &str,
    repo: &dyn ApplicationRepository,
) -> Result<Option<String>, DomainError> {
    let normalized = identifier::normalize(game_identifier);
    if normalized.is_empty() {
        return Ok(None);
    }
    Ok(repo
        .find_by_game_identifier(&normalized)
        .await?
        .and_then(|a| a.external_account_id))
}

/// Game identifier recorded with an external account id, regardless of
/// status.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn resolve_game_identifier(
    external_account_id: &str,
    repo: &dyn ApplicationRepository,
) -> Result<Option<String>, DomainError> {
    let normalized = identifier::normalize(external_account_id);
    if normalized.is_empty() {
        return Ok(None);
    }
    Ok(repo
        .find_by_external_account_id(&normalized)
        .await?
        .map(|a| a.game_identifier))
}

fn require_identifier(raw: &str) -> Result<(), DomainError> {
    if identifier::normalize(raw).is_empty() {
        return Err(DomainError::validation("identifier", "must not be empty"));
    }
    Ok(())
}

/// Game-server check that accepts either identifier space.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the identifier is blank, or
/// `DomainError::Infrastructure` if the store fails.
pub async fn check_identifier(
    raw: &str,
    repo: &dyn ApplicationRepository,
) -> Result<bool, DomainError> {
    require_identifier(raw)?;
    is_approved(raw, repo).await
}

/// Game-server lookup by game identifier.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the identifier is blank, or
/// `DomainError::Infrastructure` if the store fails.
pub async fn lookup_game_identifier(
    raw: &str,
    repo: &dyn ApplicationRepository,
) -> Result<IdentifierLookup, DomainError> {
    require_identifier(raw)?;
    Ok(IdentifierLookup {
        whitelisted: is_approved_by(IdentifierKind::GameIdentifier, raw, repo).await?,
        counterpart: resolve_external_account_id(raw, repo).await?,
    })
}

/// Game-server lookup by external account id.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the identifier is blank, or
/// `DomainError::Infrastructure` if the store fails.
pub async fn lookup_external_account_id(
    raw: &str,
    repo: &dyn ApplicationRepository,
) -> Result<IdentifierLookup, DomainError> {
    require_identifier(raw)?;
    Ok(IdentifierLookup {
        whitelisted: is_approved_by(IdentifierKind::ExternalAccountId, raw, repo).await?,
        counterpart: resolve_game_identifier(raw, repo).await?,
    })
}

/// Every approved game identifier, distinct and ascending.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_approved(repo: &dyn ApplicationRepository) -> Result<Vec<String>, DomainError> {
    let mut identifiers = repo.list_approved_game_identifiers().await?;
    identifiers.sort_unstable();
    identifiers.dedup();
    Ok(identifiers)
}

/// Retrieves an application by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no such application exists.
pub async fn get_application(
    application_id: i64,
    repo: &dyn ApplicationRepository,
    config: &LifecycleConfig,
) -> Result<ApplicationView, DomainError> {
    let application = repo
        .get_by_id(application_id)
        .await?
        .ok_or(DomainError::NotFound(application_id))?;
    Ok(ApplicationView::new(application, config))
}

/// Hours an applicant has in the community's titles, for reviewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaytimeReport {
    /// Application id.
    pub application_id: i64,
    /// Titles with hours, most played first. Empty when the profile is
    /// closed, has no relevant hours, or could not be read.
    pub games: Vec<GamePlaytime>,
}

/// Reads the applicant's relevant playtime. Only PC applications with an
/// account id are looked up; the call is bounded by
/// `config.verification_timeout` and any failure yields an empty list.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no such application exists.
#[instrument(skip(repo, verifier, config))]
pub async fn get_playtime(
    application_id: i64,
    repo: &dyn ApplicationRepository,
    verifier: Option<&dyn ProfileVerifier>,
    config: &LifecycleConfig,
) -> Result<PlaytimeReport, DomainError> {
    let application = repo
        .get_by_id(application_id)
        .await?
        .ok_or(DomainError::NotFound(application_id))?;

    let account_id = application
        .external_account_id
        .as_deref()
        .filter(|_| application.platform == Platform::Pc);
    let mut games = match (verifier, account_id) {
        (Some(verifier), Some(account_id)) => {
            match tokio::time::timeout(
                config.verification_timeout,
                verifier.relevant_playtime(account_id),
            )
            .await
            {
                Ok(Ok(games)) => games,
                Ok(Err(e)) => {
                    warn!(error = %e, "playtime lookup failed; reporting none");
                    Vec::new()
                }
                Err(_) => {
                    warn!("playtime lookup timed out; reporting none");
                    Vec::new()
                }
            }
        }
        _ => Vec::new(),
    };
    games.sort_by(|a, b| b.hours.total_cmp(&a.hours));

    Ok(PlaytimeReport {
        application_id,
        games,
    })
}

/// The submitter's most recent application, if any.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn get_submitter_status(
    submitter_id: i64,
    repo: &dyn ApplicationRepository,
    config: &LifecycleConfig,
) -> Result<Option<ApplicationView>, DomainError> {
    Ok(repo
        .get_latest_by_submitter(submitter_id)
        .await?
        .map(|a| ApplicationView::new(a, config)))
}

/// Administrative listing, newest first. `limit` defaults to
/// `DEFAULT_PAGE_SIZE` and is clamped to `1..=MAX_PAGE_SIZE`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_applications(
    status: Option<ApplicationStatus>,
    limit: Option<u32>,
    offset: Option<u32>,
    repo: &dyn ApplicationRepository,
    config: &LifecycleConfig,
) -> Result<Vec<ApplicationView>, DomainError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let applications = repo
        .list_by_status(status, limit, offset.unwrap_or(0))
        .await?;
    Ok(applications
        .into_iter()
        .map(|a| ApplicationView::new(a, config))
        .collect())
}

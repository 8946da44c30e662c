//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use whitelist_applications::application::command_handlers::LifecycleServices;
use whitelist_applications::domain::lifecycle::LifecycleConfig;
use whitelist_core::authorization::{AllowList, DeciderAuthorization};
use whitelist_core::clock::{Clock, SystemClock};
use whitelist_core::notifier::StatusNotifier;
use whitelist_core::repository::ApplicationRepository;
use whitelist_core::verifier::ProfileVerifier;
use whitelist_integrations::{LogNotifier, SteamProfileVerifier, WebhookNotifier};
use whitelist_store::{SqliteApplicationRepository, SqliteDatabase};

use crate::config::Config;
use crate::error::AppError;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store.
    pub repository: Arc<dyn ApplicationRepository>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Decision notifications.
    pub notifier: Arc<dyn StatusNotifier>,
    /// Profile verification for PC submissions, when configured.
    pub verifier: Option<Arc<dyn ProfileVerifier>>,
    /// Who may decide applications.
    pub authorization: Arc<dyn DeciderAuthorization>,
    /// Lifecycle policy.
    pub lifecycle: LifecycleConfig,
}

impl AppState {
    /// Create new application state without profile verification.
    #[must_use]
    pub fn new(
        repository: Arc<dyn ApplicationRepository>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn StatusNotifier>,
        authorization: Arc<dyn DeciderAuthorization>,
        lifecycle: LifecycleConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            notifier,
            verifier: None,
            authorization,
            lifecycle,
        }
    }

    /// Enables profile verification.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn ProfileVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Wires production collaborators from `config` around `database`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if an HTTP collaborator cannot be built.
    pub fn from_config(config: &Config, database: &SqliteDatabase) -> Result<Self, AppError> {
        let notifier: Arc<dyn StatusNotifier> = match &config.notify_webhook_url {
            Some(url) => Arc::new(
                WebhookNotifier::new(url.clone(), WEBHOOK_TIMEOUT)
                    .map_err(|e| AppError::Config(e.to_string()))?,
            ),
            None => Arc::new(LogNotifier),
        };

        let state = Self::new(
            Arc::new(SqliteApplicationRepository::new(database.pool().clone())),
            Arc::new(SystemClock),
            notifier,
            Arc::new(AllowList::new(config.admin_ids.iter().copied())),
            config.lifecycle(),
        );

        match &config.steam_api_key {
            Some(key) => {
                let verifier = SteamProfileVerifier::new(key.clone(), config.profile_check_timeout)
                    .map_err(|e| AppError::Config(e.to_string()))?;
                Ok(state.with_verifier(Arc::new(verifier)))
            }
            None => Ok(state),
        }
    }

    /// Borrows the collaborators for one lifecycle call.
    #[must_use]
    pub fn lifecycle_services(&self) -> LifecycleServices<'_> {
        LifecycleServices {
            repository: self.repository.as_ref(),
            clock: self.clock.as_ref(),
            notifier: Arc::clone(&self.notifier),
            verifier: self.verifier.as_deref(),
            config: &self.lifecycle,
        }
    }
}

//! Test notifiers and profile verifiers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use whitelist_core::error::DomainError;
use whitelist_core::notifier::{StatusNotification, StatusNotifier};
use whitelist_core::verifier::{GamePlaytime, ProfileVerifier, ProfileVisibility};

/// A notifier that records every notification it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<StatusNotification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all notifications sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<StatusNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Yields to the runtime until at least `count` notifications have
    /// arrived, then returns them. Notifications are delivered on a
    /// spawned task, so tests wait here instead of reading `sent` directly.
    ///
    /// # Panics
    ///
    /// Panics if the notifications do not arrive within one second.
    pub async fn wait_for(&self, count: usize) -> Vec<StatusNotification> {
        let arrived = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                let sent = self.sent();
                if sent.len() >= count {
                    return sent;
                }
                tokio::task::yield_now().await;
            }
        })
        .await;
        arrived.unwrap_or_else(|_| panic!("expected {count} notification(s), got {:?}", self.sent()))
    }
}

#[async_trait]
impl StatusNotifier for RecordingNotifier {
    async fn notify(&self, notification: &StatusNotification) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// A notifier that always fails.
#[derive(Debug)]
pub struct FailingNotifier;

#[async_trait]
impl StatusNotifier for FailingNotifier {
    async fn notify(&self, _notification: &StatusNotification) -> Result<(), DomainError> {
        Err(DomainError::Dependency("recipient unreachable".into()))
    }
}

/// A notifier whose recipient never answers.
#[derive(Debug)]
pub struct HangingNotifier;

#[async_trait]
impl StatusNotifier for HangingNotifier {
    async fn notify(&self, _notification: &StatusNotification) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// A verifier that returns fixed results and counts its profile checks.
#[derive(Debug)]
pub struct StaticVerifier {
    result: ProfileVisibility,
    playtime: Vec<GamePlaytime>,
    calls: AtomicUsize,
}

impl StaticVerifier {
    /// A verifier reporting every profile as open.
    #[must_use]
    pub fn open() -> Self {
        Self::with(ProfileVisibility::new(true, true, true))
    }

    /// A verifier reporting every profile as private.
    #[must_use]
    pub fn closed() -> Self {
        Self::with(ProfileVisibility::new(false, false, false))
    }

    /// A verifier returning `result`.
    #[must_use]
    pub fn with(result: ProfileVisibility) -> Self {
        Self {
            result,
            playtime: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Reports `games` as the applicant's relevant playtime.
    #[must_use]
    pub fn with_playtime(mut self, games: &[(&str, f64)]) -> Self {
        self.playtime = games
            .iter()
            .map(|(name, hours)| GamePlaytime {
                name: (*name).to_owned(),
                hours: *hours,
            })
            .collect();
        self
    }

    /// Number of checks performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileVerifier for StaticVerifier {
    async fn check_profile_public(
        &self,
        _external_account_id: &str,
    ) -> Result<ProfileVisibility, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }

    async fn relevant_playtime(
        &self,
        _external_account_id: &str,
    ) -> Result<Vec<GamePlaytime>, DomainError> {
        Ok(self.playtime.clone())
    }
}

/// A verifier whose backing service is down.
#[derive(Debug)]
pub struct FailingVerifier;

#[async_trait]
impl ProfileVerifier for FailingVerifier {
    async fn check_profile_public(
        &self,
        _external_account_id: &str,
    ) -> Result<ProfileVisibility, DomainError> {
        Err(DomainError::Dependency("profile service returned 503".into()))
    }

    async fn relevant_playtime(
        &self,
        _external_account_id: &str,
    ) -> Result<Vec<GamePlaytime>, DomainError> {
        Err(DomainError::Dependency("profile service returned 503".into()))
    }
}

/// A verifier that never answers within any reasonable timeout.
#[derive(Debug)]
pub struct HangingVerifier;

#[async_trait]
impl ProfileVerifier for HangingVerifier {
    async fn check_profile_public(
        &self,
        _external_account_id: &str,
    ) -> Result<ProfileVisibility, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ProfileVisibility::default())
    }

    async fn relevant_playtime(
        &self,
        _external_account_id: &str,
    ) -> Result<Vec<GamePlaytime>, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

//! Command handlers for the lifecycle engine.
//!
//! Each handler validates its input, consults the transition table, and
//! performs exactly one state-changing repository call. The returned record
//! is re-read after the write and is authoritative.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, debug, info, instrument, warn};
use whitelist_core::clock::Clock;
use whitelist_core::error::DomainError;
use whitelist_core::model::{
    Application, ApplicationProfile, NewApplication, Platform, StatusChange,
};
use whitelist_core::notifier::{StatusNotification, StatusNotifier};
use whitelist_core::repository::ApplicationRepository;
use whitelist_core::verifier::{ProfileVerifier, ProfileVisibility};

use crate::domain::commands::{DecideApplication, ResubmitApplication, SubmitApplication};
use crate::domain::lifecycle::{LifecycleConfig, Transition, check_transition};
use crate::domain::validation::{decision_comment, validate_profile};

/// Collaborators the lifecycle engine needs for one call.
#[derive(Clone)]
pub struct LifecycleServices<'a> {
    /// Record store.
    pub repository: &'a dyn ApplicationRepository,
    /// Time source for `created_at`/`updated_at`.
    pub clock: &'a dyn Clock,
    /// Receives decision notifications. Shared so delivery can outlive the
    /// call.
    pub notifier: Arc<dyn StatusNotifier>,
    /// Optional profile visibility check for PC submissions.
    pub verifier: Option<&'a dyn ProfileVerifier>,
    /// Deployment policy.
    pub config: &'a LifecycleConfig,
}

/// Loads a record that a handler just wrote.
async fn reload(
    repository: &dyn ApplicationRepository,
    application_id: i64,
) -> Result<Application, DomainError> {
    repository
        .get_by_id(application_id)
        .await?
        .ok_or(DomainError::NotFound(application_id))
}

/// Runs the profile check with a deadline. `None` means the check was
/// skipped.
async fn verify_profile(
    verifier: &dyn ProfileVerifier,
    external_account_id: &str,
    timeout: Duration,
) -> Option<ProfileVisibility> {
    match tokio::time::timeout(timeout, verifier.check_profile_public(external_account_id)).await
    {
        Ok(Ok(visibility)) => Some(visibility),
        Ok(Err(e)) => {
            warn!(error = %e, "profile verification failed; skipping check");
            None
        }
        Err(_) => {
            warn!(?timeout, "profile verification timed out; skipping check");
            None
        }
    }
}

/// Delivers a notification without holding up the caller. Failures are
/// logged and never affect the recorded decision.
fn notify_in_background(notifier: Arc<dyn StatusNotifier>, notification: StatusNotification) {
    tokio::spawn(
        async move {
            if let Err(e) = notifier.notify(&notification).await {
                warn!(
                    error = %e,
                    submitter_id = notification.submitter_id,
                    "failed to notify submitter"
                );
            }
        }
        .in_current_span(),
    );
}

/// Rejects PC profiles the verifier reports as closed. Skipped checks pass.
async fn ensure_profile_open(
    services: &LifecycleServices<'_>,
    profile: &ApplicationProfile,
) -> Result<(), DomainError> {
    if profile.platform != Platform::Pc {
        return Ok(());
    }
    let (Some(verifier), Some(account_id)) =
        (services.verifier, profile.external_account_id.as_deref())
    else {
        return Ok(());
    };

    match verify_profile(verifier, account_id, services.config.verification_timeout).await {
        Some(visibility) if !visibility.open => {
            debug!(?visibility, "profile is not open");
            Err(DomainError::validation(
                "external_account_id",
                "the Steam profile and game details must be public",
            ))
        }
        _ => Ok(()),
    }
}

/// Handles `SubmitApplication`: validates the profile, enforces one active
/// application per submitter, and creates a `pending` record.
///
/// # Errors
///
/// Returns `DomainError::Validation` for malformed input or a closed
/// profile, `DomainError::Conflict` if the submitter already has an active
/// application, or a repository error.
#[instrument(
    skip(command, services),
    fields(correlation_id = %command.correlation_id, submitter_id = command.submitter_id)
)]
pub async fn handle_submit_application(
    command: &SubmitApplication,
    services: &LifecycleServices<'_>,
) -> Result<Application, DomainError> {
    let profile = validate_profile(&command.profile)?;

    if let Some(existing) = services
        .repository
        .get_latest_by_submitter(command.submitter_id)
        .await?
        .filter(|a| a.status.is_active())
    {
        info!(application_id = existing.id, "submitter already has an active application");
        return Err(DomainError::Conflict(format!(
            "submitter {} already has application {} in status {}",
            command.submitter_id, existing.id, existing.status
        )));
    }

    ensure_profile_open(services, &profile).await?;

    let application_id = services
        .repository
        .create(&NewApplication {
            submitter_id: command.submitter_id,
            profile,
            created_at: services.clock.now(),
        })
        .await?;

    info!(application_id, "application submitted");
    reload(services.repository, application_id).await
}

/// Handles `ResubmitApplication`: overwrites the profile of a `rejected` or
/// `needs_fix` record owned by the submitter and re-queues it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the record does not exist, belongs to
/// someone else, or changed concurrently; `DomainError::InvalidTransition`
/// if its status does not allow resubmission; `DomainError::Validation` for
/// malformed input.
#[instrument(
    skip(command, services),
    fields(correlation_id = %command.correlation_id, application_id = command.application_id)
)]
pub async fn handle_resubmit_application(
    command: &ResubmitApplication,
    services: &LifecycleServices<'_>,
) -> Result<Application, DomainError> {
    let profile = validate_profile(&command.profile)?;

    let current = services
        .repository
        .get_by_id(command.application_id)
        .await?
        .filter(|a| a.submitter_id == command.submitter_id)
        .ok_or(DomainError::NotFound(command.application_id))?;

    check_transition(
        services.config,
        current.id,
        current.status,
        Transition::Resubmit,
    )?;

    ensure_profile_open(services, &profile).await?;

    let applied = services
        .repository
        .resubmit(current.id, current.status, &profile, services.clock.now())
        .await?;
    if !applied {
        info!("application changed before resubmission was applied");
        return Err(DomainError::NotFound(current.id));
    }

    info!(previous_status = %current.status, "application resubmitted");
    reload(services.repository, current.id).await
}

/// Handles `DecideApplication`: records an administrator verdict and
/// notifies the submitter.
///
/// The caller is responsible for authorising `decider_id`. Notification is
/// best-effort and never undoes the decision.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the record does not exist or changed
/// concurrently, `DomainError::InvalidTransition` if the decision is not
/// legal from the current status, or `DomainError::Validation` for an
/// oversized comment.
#[instrument(
    skip(command, services),
    fields(
        correlation_id = %command.correlation_id,
        application_id = command.application_id,
        decision = command.decision.action()
    )
)]
pub async fn handle_decide_application(
    command: &DecideApplication,
    services: &LifecycleServices<'_>,
) -> Result<Application, DomainError> {
    let current = reload(services.repository, command.application_id).await?;

    let status = check_transition(
        services.config,
        current.id,
        current.status,
        Transition::Decide(command.decision),
    )?;
    let admin_comment = decision_comment(command.decision, command.comment.as_deref())?;

    let change = StatusChange {
        expected: current.status,
        status,
        admin_comment,
        decided_by: Some(command.decider_id),
        at: services.clock.now(),
    };
    if !services.repository.update_status(current.id, &change).await? {
        info!("application changed before the decision was applied");
        return Err(DomainError::NotFound(current.id));
    }

    let decided = reload(services.repository, current.id).await?;
    info!(decider_id = command.decider_id, status = %decided.status, "application decided");

    notify_in_background(Arc::clone(&services.notifier), StatusNotification::from(&decided));

    Ok(decided)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;
    use whitelist_core::error::DomainError;
    use whitelist_core::model::{Application, ApplicationStatus, Platform};
    use whitelist_core::repository::ApplicationRepository;
    use whitelist_core::verifier::ProfileVerifier;
    use whitelist_test_support::{
        FailingApplicationRepository, FailingNotifier, FailingVerifier, FixedClock,
        HangingNotifier, HangingVerifier, InMemoryApplicationRepository, RecordingNotifier,
        StaticVerifier,
    };

    use super::*;
    use crate::domain::commands::{Decision, ProfileSubmission};
    use crate::domain::lifecycle::APPROVAL_COMMENT;

    const STEAM_ID: &str = "76561198000000000";

    struct Harness {
        repository: InMemoryApplicationRepository,
        clock: FixedClock,
        notifier: Arc<RecordingNotifier>,
        config: LifecycleConfig,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(LifecycleConfig::default())
        }

        fn with_config(config: LifecycleConfig) -> Self {
            Self {
                repository: InMemoryApplicationRepository::new(),
                clock: FixedClock::standard(),
                notifier: Arc::new(RecordingNotifier::new()),
                config,
            }
        }

        fn services(&self) -> LifecycleServices<'_> {
            LifecycleServices {
                repository: &self.repository,
                clock: &self.clock,
                notifier: self.notifier.clone(),
                verifier: None,
                config: &self.config,
            }
        }

        async fn submit(&self, submitter_id: i64) -> Result<Application, DomainError> {
            handle_submit_application(&submit_command(submitter_id, pc_profile()), &self.services())
                .await
        }

        async fn decide(&self, application_id: i64, decision: Decision) -> Result<Application, DomainError> {
            handle_decide_application(&decide_command(application_id, decision), &self.services())
                .await
        }

        async fn resubmit(
            &self,
            application_id: i64,
            submitter_id: i64,
        ) -> Result<Application, DomainError> {
            let command = ResubmitApplication {
                correlation_id: Uuid::new_v4(),
                application_id,
                submitter_id,
                profile: ProfileSubmission {
                    display_name: "Alaric the Second".to_owned(),
                    ..pc_profile()
                },
            };
            handle_resubmit_application(&command, &self.services()).await
        }
    }

    fn pc_profile() -> ProfileSubmission {
        ProfileSubmission {
            display_name: "Alaric".to_owned(),
            game_identifier: "Alaric-01".to_owned(),
            platform: "pc".to_owned(),
            external_account_id: Some(STEAM_ID.to_owned()),
        }
    }

    fn submit_command(submitter_id: i64, profile: ProfileSubmission) -> SubmitApplication {
        SubmitApplication {
            correlation_id: Uuid::new_v4(),
            submitter_id,
            profile,
        }
    }

    fn decide_command(application_id: i64, decision: Decision) -> DecideApplication {
        DecideApplication {
            correlation_id: Uuid::new_v4(),
            application_id,
            decision,
            comment: Some("see notes".to_owned()),
            decider_id: 42,
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_record() {
        // Arrange
        let harness = Harness::new();

        // Act
        let application = harness.submit(7).await.unwrap();

        // Assert
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.submitter_id, 7);
        assert_eq!(application.game_identifier, "alaric-01");
        assert_eq!(application.platform, Platform::Pc);
        assert_eq!(application.created_at, harness.clock.0);
        assert_eq!(application.admin_comment, None);
        assert_eq!(harness.repository.all().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_then_approve_whitelists_the_player() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();

        // Act
        let decided = harness.decide(submitted.id, Decision::Approved).await.unwrap();

        // Assert
        assert_eq!(decided.status, ApplicationStatus::Approved);
        assert_eq!(decided.admin_comment.as_deref(), Some(APPROVAL_COMMENT));
        assert_eq!(decided.decided_by, Some(42));
        assert!(
            harness
                .repository
                .has_approved(
                    whitelist_core::repository::IdentifierKind::GameIdentifier,
                    "alaric-01"
                )
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_profile_link_without_storing() {
        // Arrange
        let harness = Harness::new();
        let profile = ProfileSubmission {
            platform: "PC".to_owned(),
            external_account_id: Some(
                "https://steamcommunity.com/profiles/76561198000000000".to_owned(),
            ),
            ..pc_profile()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, profile), &harness.services()).await;

        // Assert
        match result {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "external_account_id"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(harness.repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_second_submission_before_decision_conflicts() {
        // Arrange
        let harness = Harness::new();
        harness.submit(7).await.unwrap();

        // Act
        let result = harness.submit(7).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(harness.repository.all().len(), 1);
    }

    #[tokio::test]
    async fn test_submission_after_rejection_creates_new_record() {
        // Arrange
        let harness = Harness::new();
        let first = harness.submit(7).await.unwrap();
        harness.decide(first.id, Decision::Rejected).await.unwrap();

        // Act
        let second = harness.submit(7).await.unwrap();

        // Assert
        assert!(second.id > first.id);
        assert_eq!(second.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_console_submission_without_account_id_succeeds() {
        // Arrange
        let harness = Harness::new();
        let profile = ProfileSubmission {
            platform: "XBOX".to_owned(),
            external_account_id: None,
            ..pc_profile()
        };

        // Act
        let application =
            handle_submit_application(&submit_command(7, profile), &harness.services())
                .await
                .unwrap();

        // Assert
        assert_eq!(application.platform, Platform::Xbox);
        assert_eq!(application.external_account_id, None);
    }

    #[tokio::test]
    async fn test_closed_profile_is_rejected() {
        // Arrange
        let harness = Harness::new();
        let verifier = StaticVerifier::closed();
        let services = LifecycleServices {
            verifier: Some(&verifier),
            ..harness.services()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, pc_profile()), &services).await;

        // Assert
        assert!(matches!(
            result,
            Err(DomainError::Validation { field: "external_account_id", .. })
        ));
        assert_eq!(verifier.calls(), 1);
        assert!(harness.repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_open_profile_is_accepted() {
        // Arrange
        let harness = Harness::new();
        let verifier = StaticVerifier::open();
        let services = LifecycleServices {
            verifier: Some(&verifier),
            ..harness.services()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, pc_profile()), &services).await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_verifier_is_skipped() {
        // Arrange
        let harness = Harness::new();
        let verifier = FailingVerifier;
        let services = LifecycleServices {
            verifier: Some(&verifier as &dyn ProfileVerifier),
            ..harness.services()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, pc_profile()), &services).await;

        // Assert
        assert_eq!(result.unwrap().status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_hanging_verifier_times_out_and_is_skipped() {
        // Arrange
        let harness = Harness::with_config(LifecycleConfig {
            verification_timeout: Duration::from_millis(20),
            ..LifecycleConfig::default()
        });
        let verifier = HangingVerifier;
        let services = LifecycleServices {
            verifier: Some(&verifier as &dyn ProfileVerifier),
            ..harness.services()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, pc_profile()), &services).await;

        // Assert
        assert_eq!(result.unwrap().status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_verifier_is_not_consulted_for_consoles() {
        // Arrange
        let harness = Harness::new();
        let verifier = StaticVerifier::closed();
        let services = LifecycleServices {
            verifier: Some(&verifier),
            ..harness.services()
        };
        let profile = ProfileSubmission {
            platform: "ps".to_owned(),
            external_account_id: Some("psn-alaric".to_owned()),
            ..pc_profile()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, profile), &services).await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_decide_unknown_application_is_not_found() {
        // Arrange
        let harness = Harness::new();

        // Act
        let result = handle_decide_application(
            &DecideApplication {
                decider_id: 1,
                ..decide_command(999, Decision::Approved)
            },
            &harness.services(),
        )
        .await;

        // Assert
        assert!(matches!(result, Err(DomainError::NotFound(999))));
        assert!(harness.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_decide_notifies_submitter() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();

        // Act
        let decided = harness.decide(submitted.id, Decision::NeedsFix).await.unwrap();

        // Assert
        assert_eq!(decided.admin_comment.as_deref(), Some("see notes"));
        let sent = harness.notifier.wait_for(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].submitter_id, 7);
        assert_eq!(sent[0].status, ApplicationStatus::NeedsFix);
        assert_eq!(sent[0].comment.as_deref(), Some("see notes"));
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_the_decision() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();
        let services = LifecycleServices {
            notifier: Arc::new(FailingNotifier),
            ..harness.services()
        };

        // Act
        let decided = handle_decide_application(
            &decide_command(submitted.id, Decision::Rejected),
            &services,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(decided.status, ApplicationStatus::Rejected);
        assert_eq!(
            harness.repository.all()[0].status,
            ApplicationStatus::Rejected
        );
    }

    #[tokio::test]
    async fn test_slow_notifier_does_not_delay_the_decision() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();
        let services = LifecycleServices {
            notifier: Arc::new(HangingNotifier),
            ..harness.services()
        };

        // Act
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            handle_decide_application(&decide_command(submitted.id, Decision::Approved), &services),
        )
        .await;

        // Assert
        let decided = result.expect("decision waited on the notifier").unwrap();
        assert_eq!(decided.status, ApplicationStatus::Approved);
        assert_eq!(
            harness.repository.all()[0].status,
            ApplicationStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_approved_application_cannot_be_decided_again() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();
        harness.decide(submitted.id, Decision::Approved).await.unwrap();

        // Act
        let result = harness.decide(submitted.id, Decision::Rejected).await;

        // Assert
        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition {
                status: ApplicationStatus::Approved,
                ..
            })
        ));
        assert_eq!(harness.notifier.wait_for(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_redecide_policy_allows_revoking_approval() {
        // Arrange
        let harness = Harness::with_config(LifecycleConfig {
            redecide_approved: true,
            ..LifecycleConfig::default()
        });
        let submitted = harness.submit(7).await.unwrap();
        harness.decide(submitted.id, Decision::Approved).await.unwrap();

        // Act
        let revoked = harness.decide(submitted.id, Decision::Rejected).await.unwrap();

        // Assert
        assert_eq!(revoked.status, ApplicationStatus::Rejected);
    }

    #[tokio::test]
    async fn test_needs_fix_is_refused_when_disabled() {
        // Arrange
        let harness = Harness::with_config(LifecycleConfig {
            needs_fix_enabled: false,
            ..LifecycleConfig::default()
        });
        let submitted = harness.submit(7).await.unwrap();

        // Act
        let result = harness.decide(submitted.id, Decision::NeedsFix).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        assert_eq!(
            harness.repository.all()[0].status,
            ApplicationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_resubmit_resets_decision_state() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();
        harness.decide(submitted.id, Decision::NeedsFix).await.unwrap();

        // Act
        let resubmitted = harness.resubmit(submitted.id, 7).await.unwrap();

        // Assert
        assert_eq!(resubmitted.id, submitted.id);
        assert_eq!(resubmitted.status, ApplicationStatus::Pending);
        assert_eq!(resubmitted.admin_comment, None);
        assert_eq!(resubmitted.decided_by, None);
        assert_eq!(resubmitted.display_name, "Alaric the Second");

        let reread = harness.repository.get_by_id(submitted.id).await.unwrap().unwrap();
        assert_eq!(reread, resubmitted);
    }

    #[tokio::test]
    async fn test_resubmit_pending_application_is_invalid() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();

        // Act
        let result = harness.resubmit(submitted.id, 7).await;

        // Assert
        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition {
                action: "resubmit",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_resubmit_by_another_submitter_is_not_found() {
        // Arrange
        let harness = Harness::new();
        let submitted = harness.submit(7).await.unwrap();
        harness.decide(submitted.id, Decision::Rejected).await.unwrap();

        // Act
        let result = harness.resubmit(submitted.id, 8).await;

        // Assert
        assert!(matches!(result, Err(DomainError::NotFound(id)) if id == submitted.id));
        assert_eq!(
            harness.repository.all()[0].status,
            ApplicationStatus::Rejected
        );
    }

    #[tokio::test]
    async fn test_resubmit_old_record_conflicts_with_newer_active_one() {
        // Arrange
        let harness = Harness::new();
        let first = harness.submit(7).await.unwrap();
        harness.decide(first.id, Decision::Rejected).await.unwrap();
        harness.submit(7).await.unwrap();

        // Act
        let result = harness.resubmit(first.id, 7).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_repository_failure_is_propagated() {
        // Arrange
        let harness = Harness::new();
        let services = LifecycleServices {
            repository: &FailingApplicationRepository as &dyn ApplicationRepository,
            ..harness.services()
        };

        // Act
        let result = handle_submit_application(&submit_command(7, pc_profile()), &services).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_any_operation_sequence_keeps_one_active_application_per_submitter() {
        // Arrange
        let harness = Harness::with_config(LifecycleConfig {
            redecide_approved: true,
            ..LifecycleConfig::default()
        });
        let decisions = [Decision::NeedsFix, Decision::Rejected, Decision::Approved];

        // Act
        for step in 0..60_i64 {
            let submitter = step % 3;
            let latest = harness
                .repository
                .get_latest_by_submitter(submitter)
                .await
                .unwrap();
            let _ = match (step % 4, latest) {
                (0, _) | (_, None) => harness.submit(submitter).await,
                (1 | 3, Some(a)) => {
                    let decision = decisions[usize::try_from(step % 3).unwrap()];
                    harness.decide(a.id, decision).await
                }
                (_, Some(a)) => harness.resubmit(a.id, submitter).await,
            };

            // Assert
            for submitter in 0..3 {
                let active = harness
                    .repository
                    .all()
                    .iter()
                    .filter(|a| a.submitter_id == submitter && a.status.is_active())
                    .count();
                assert!(active <= 1, "submitter {submitter} has {active} active records");
            }
            assert!(
                harness
                    .repository
                    .all()
                    .iter()
                    .all(|a| a.status != ApplicationStatus::Pending || a.decided_by.is_none())
            );
        }
    }
}

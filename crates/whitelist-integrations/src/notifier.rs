//! Status notifiers.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument};
use whitelist_core::error::DomainError;
use whitelist_core::notifier::{StatusNotification, StatusNotifier};

/// Posts each notification as JSON to a webhook (typically the chat bot,
/// which relays it to the submitter).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `url`. `timeout` bounds each request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Dependency` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Dependency(format!("webhook client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl StatusNotifier for WebhookNotifier {
    #[instrument(skip(self, notification), fields(application_id = notification.application_id))]
    async fn notify(&self, notification: &StatusNotification) -> Result<(), DomainError> {
        let response = self
            .http
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| DomainError::Dependency(format!("webhook: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Dependency(format!(
                "webhook returned {status}"
            )));
        }
        Ok(())
    }
}

/// Writes notifications to the log. Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl StatusNotifier for LogNotifier {
    async fn notify(&self, notification: &StatusNotification) -> Result<(), DomainError> {
        info!(
            application_id = notification.application_id,
            submitter_id = notification.submitter_id,
            status = %notification.status,
            comment = notification.comment.as_deref().unwrap_or(""),
            "status notification"
        );
        Ok(())
    }
}

use async_trait::async_trait;
use std::sync::Arc;
use std::time;
use tracing::Instrument;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::notification::template::NotificationEmail;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to the email provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Email provider rejected the message: {0}")]
    Rejected(String),
}

/// Something able to deliver one HTML email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html: &str,
    ) -> Result<(), TransportError>;
}

/// Result of one delivery attempt. Only lives for the duration of a fan-out.
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    pub subscriber_email: SubscriberEmail,
    pub delivered: bool,
    pub error_detail: Option<String>,
}

impl NotificationOutcome {
    fn delivered(subscriber_email: SubscriberEmail) -> Self {
        Self {
            subscriber_email,
            delivered: true,
            error_detail: None,
        }
    }

    fn failed(subscriber_email: SubscriberEmail, error_detail: String) -> Self {
        Self {
            subscriber_email,
            delivered: false,
            error_detail: Some(error_detail),
        }
    }
}

/// Sends one message per call and turns every transport failure into an outcome.
///
/// `send` never returns an error: auth, network and provider failures, as well as
/// a transport call exceeding `timeout`, come back as `delivered == false`.
#[derive(Clone)]
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    timeout: time::Duration,
}

impl MailDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, timeout: time::Duration) -> Self {
        Self { transport, timeout }
    }

    pub async fn send(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html: &str,
    ) -> NotificationOutcome {
        let attempt = tokio::time::timeout(self.timeout, self.transport.send(recipient, subject, html));

        let outcome = match attempt.await {
            Ok(Ok(())) => NotificationOutcome::delivered(recipient.clone()),
            Ok(Err(err)) => NotificationOutcome::failed(recipient.clone(), err.to_string()),
            Err(_) => NotificationOutcome::failed(
                recipient.clone(),
                format!(
                    "Email provider did not answer within {} ms",
                    self.timeout.as_millis()
                ),
            ),
        };

        if let Some(detail) = &outcome.error_detail {
            tracing::warn!(
                subscriber_email = %recipient,
                error.detail = %detail,
                "Failed to deliver email"
            );
        }

        outcome
    }

    /// Sends from a background task. The caller never waits and the outcome is only logged.
    pub fn send_in_background(
        &self,
        recipient: SubscriberEmail,
        email: NotificationEmail,
    ) -> tokio::task::JoinHandle<NotificationOutcome> {
        let dispatcher = self.clone();

        tokio::spawn(
            async move { dispatcher.send(&recipient, &email.subject, &email.html).await }
                .in_current_span(),
        )
    }
}

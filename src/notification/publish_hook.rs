use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};
use tracing::Instrument;

use crate::domain::content::{ContentKind, PublishableContent};
use crate::notification::directory::{DirectoryError, SubscriberDirectory};
use crate::notification::dispatcher::MailDispatcher;
use crate::notification::template::{TemplateError, TemplateGenerator};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to generate the notification email.")]
    Template(#[from] TemplateError),
    #[error("Failed to load the newsletter subscribers.")]
    Directory(#[from] DirectoryError),
}

/// Aggregate of one fan-out; the only trace a publish event leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    pub content_type: ContentKind,
    pub content_title: String,
    pub subscriber_count: usize,
    pub delivered_count: usize,
    pub failed_count: usize,
}

#[derive(Clone)]
pub struct PublishHook {
    templates: TemplateGenerator,
    directory: Arc<dyn SubscriberDirectory>,
    dispatcher: MailDispatcher,
}

impl PublishHook {
    pub fn new(
        templates: TemplateGenerator,
        directory: Arc<dyn SubscriberDirectory>,
        dispatcher: MailDispatcher,
    ) -> Self {
        Self {
            templates,
            directory,
            dispatcher,
        }
    }

    /// Called by creation handlers right after a successful insert.
    ///
    /// Starts the fan-out in the background when the record was newly created and
    /// is published, and returns a handle to it. Otherwise nothing happens and
    /// `None` is returned.
    pub fn trigger(
        &self,
        content: PublishableContent,
        newly_created: bool,
    ) -> Option<JoinHandle<Result<FanOutReport, PublishError>>> {
        if !content.is_eligible_for_notification(newly_created) {
            tracing::debug!(
                content_type = %content.kind(),
                content_id = %content.id(),
                newly_created,
                "Content is not eligible for a subscriber notification"
            );
            return None;
        }

        let hook = self.clone();

        Some(tokio::spawn(
            async move { hook.publish(&content).await }.in_current_span(),
        ))
    }

    /// Renders the email once and sends it to every subscribed address.
    ///
    /// A rendering or directory failure stops the event before any dispatch. Failed
    /// deliveries are counted; they never stop the other deliveries and are never retried.
    #[tracing::instrument(
        name = "Notifying subscribers about new content",
        skip(self, content),
        fields(
            content_type = %content.kind(),
            content_id = %content.id()
        )
    )]
    pub async fn publish(&self, content: &PublishableContent) -> Result<FanOutReport, PublishError> {
        let email = self.templates.generate(content).map_err(|err| {
            tracing::error!(error.message = %err, "Notification cancelled, the record cannot be rendered");
            err
        })?;
        let subscribers = self.directory.list_subscribed().await.map_err(|err| {
            tracing::error!(error.cause_chain = ?err, "Notification cancelled, subscribers are unavailable");
            err
        })?;

        let mut report = FanOutReport {
            content_type: content.kind(),
            content_title: content.title().to_string(),
            subscriber_count: subscribers.len(),
            delivered_count: 0,
            failed_count: 0,
        };

        let email = Arc::new(email);
        let mut dispatches = JoinSet::new();
        for subscriber in subscribers {
            let dispatcher = self.dispatcher.clone();
            let email = Arc::clone(&email);
            dispatches.spawn(
                async move {
                    dispatcher
                        .send(&subscriber.email, &email.subject, &email.html)
                        .await
                }
                .in_current_span(),
            );
        }

        while let Some(joined) = dispatches.join_next().await {
            match joined {
                Ok(outcome) if outcome.delivered => report.delivered_count += 1,
                Ok(_) => report.failed_count += 1,
                Err(err) => {
                    tracing::error!(error.message = %err, "Notification dispatch task did not complete");
                    report.failed_count += 1;
                }
            }
        }

        tracing::info!(
            content_type = %report.content_type,
            content_title = %report.content_title,
            subscriber_count = report.subscriber_count,
            delivered_count = report.delivered_count,
            failed_count = report.failed_count,
            "Notification fan-out completed"
        );

        Ok(report)
    }
}

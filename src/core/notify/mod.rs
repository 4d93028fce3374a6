pub mod webhook;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::formatter::ReportMessage;

/// Publish-only messaging sink.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, subject: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Sent,
    /// No destination configured.
    Skipped,
    Failed(String),
}

impl PublishOutcome {
    pub fn was_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Best-effort publisher: an absent sink is a no-op and sink errors are
/// logged and reported as [`PublishOutcome::Failed`], never returned.
pub struct Notifier {
    sink: Option<Box<dyn NotificationSink>>,
}

impl Notifier {
    pub fn new(sink: Option<Box<dyn NotificationSink>>) -> Self {
        Self { sink }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_configured(&self) -> bool {
        self.sink.is_some()
    }

    pub async fn publish(&self, message: &ReportMessage) -> PublishOutcome {
        let Some(sink) = &self.sink else {
            tracing::debug!("No notification destination configured, skipping");
            return PublishOutcome::Skipped;
        };

        match sink.publish(&message.subject, &message.body).await {
            Ok(()) => {
                tracing::info!("Published notification: {}", message.subject);
                PublishOutcome::Sent
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                tracing::warn!("Failed to publish notification: {}", reason);
                PublishOutcome::Failed(reason)
            }
        }
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::core::notify::NotificationSink;

/// Environment variable naming the notification destination.
pub const WEBHOOK_URL_ENV: &str = "COSTWATCH_WEBHOOK_URL";

#[derive(Serialize)]
struct WebhookPayload<'a> {
    subject: &'a str,
    body: &'a str,
}

/// Posts notifications as JSON to an HTTPS webhook.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        validate_endpoint(&url)?;
        Ok(Self {
            client: reqwest::Client::new(),
            url,
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(&WebhookPayload { subject, body })
            .send()
            .await
            .context("Failed to send notification to webhook")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} from webhook: {}", status.as_u16(), body);
        }
        Ok(())
    }
}

/// Reject anything but HTTPS so report contents never go out in clear text.
pub fn validate_endpoint(url: &str) -> Result<()> {
    if !url.starts_with("https://") {
        anyhow::bail!("webhook endpoint must use HTTPS, got: {}", url);
    }
    Ok(())
}

/// Destination from the environment, falling back to the configured URL.
/// Empty values count as unset.
pub fn resolve_destination(env_value: Option<String>, configured: Option<&str>) -> Option<String> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        })
}

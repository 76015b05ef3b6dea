//! Discord webhook delivery.

use async_trait::async_trait;
use bandwatch_core::error::NotifyError;
use bandwatch_core::traits::Notifier;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

/// Notification sink posting to a Discord webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl DiscordNotifier {
    /// Create a webhook notifier. The URL must already be validated as
    /// present by configuration loading.
    pub fn new(webhook_url: String, username: String) -> Result<Self, NotifyError> {
        if webhook_url.trim().is_empty() {
            return Err(NotifyError::MissingDestination);
        }
        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            webhook_url,
            username,
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn deliver(&self, message: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            content: message,
            username: &self.username,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        // Discord answers 204 on success, 200 with ?wait=true
        if status.as_u16() == 200 || status.as_u16() == 204 {
            debug!("webhook delivery confirmed");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &str {
        "discord"
    }
}

/// Sink that prints the would-be payload instead of posting it.
///
/// Reports success, so a dry run exercises the full pipeline including
/// the ledger write.
pub struct DryRunNotifier {
    username: String,
}

impl DryRunNotifier {
    pub fn new(username: String) -> Self {
        Self { username }
    }
}

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn deliver(&self, message: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            content: message,
            username: &self.username,
        };
        let body = serde_json::to_string(&payload)
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        println!("[DRY_RUN] Would POST: {}", body);
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

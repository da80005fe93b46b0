use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::{ChangeEvent, Notifier};
use crate::error::{Result, WatchError};

const SINK_NAME: &str = "discord";

#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
}

impl DiscordNotifier {
    /// `client` is the shared transport; its timeout bounds each post.
    pub fn new(webhook: String, client: Client) -> Self {
        Self { webhook, client }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        SINK_NAME
    }

    async fn notify(&self, ev: &ChangeEvent) -> Result<()> {
        let payload = DiscordWebhookPayload::text(ev.message());

        let rsp = self
            .client
            .post(&self.webhook)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::delivery(SINK_NAME, format!("request failed: {e}")))?;

        // Webhooks without `?wait=true` answer 204 on success.
        let status = rsp.status();
        if status != StatusCode::NO_CONTENT {
            let body = rsp.text().await.unwrap_or_else(|e| {
                tracing::debug!("discord: error reading body: {e}");
                String::new()
            });
            return Err(WatchError::delivery(
                SINK_NAME,
                format!("API returned {}: {body}", status.as_u16()),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct AllowedMentions {
    parse: Vec<String>,
}

#[derive(Serialize)]
struct DiscordWebhookPayload {
    content: String,
    allowed_mentions: AllowedMentions,
}

impl DiscordWebhookPayload {
    /// Plain content with every mention type disabled.
    fn text(content: String) -> Self {
        Self {
            content,
            allowed_mentions: AllowedMentions { parse: Vec::new() },
        }
    }
}

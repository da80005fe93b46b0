use async_trait::async_trait;
use reqwest::Client;

use super::{ChangeEvent, Notifier};
use crate::error::{Result, WatchError};

const SINK_NAME: &str = "slack";

pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: String, client: Client) -> Self {
        Self {
            webhook_url,
            client,
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        SINK_NAME
    }

    async fn notify(&self, ev: &ChangeEvent) -> Result<()> {
        let body = serde_json::json!({ "text": ev.message() });

        self.client
            .post(&self.webhook_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WatchError::delivery(SINK_NAME, format!("slack post: {e}")))?
            .error_for_status()
            .map_err(|e| WatchError::delivery(SINK_NAME, format!("slack non-2xx: {e}")))?;
        Ok(())
    }
}

use async_trait::async_trait;

use super::{ChangeEvent, Notifier};
use crate::error::Result;

/// Writes the message to the tracing log. Useful when no channel is set up yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, ev: &ChangeEvent) -> Result<()> {
        tracing::info!(
            target: "notify",
            available = ev.available,
            at = %ev.observed_at.to_rfc3339(),
            "{}",
            ev.message()
        );
        Ok(())
    }
}

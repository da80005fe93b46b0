// src/notify/mod.rs
pub mod discord;
pub mod email;
pub mod logger;
pub mod slack;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::sources::Identity;

pub use discord::DiscordNotifier;
pub use email::EmailNotifier;
pub use logger::LogNotifier;
pub use slack::SlackNotifier;

/// A detected in-stock / out-of-stock transition for one watch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub product: String,
    pub store: String,
    pub url: String,
    pub available: bool,
    pub observed_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(identity: Identity, available: bool, observed_at: DateTime<Utc>) -> Self {
        Self {
            product: identity.product,
            store: identity.store,
            url: identity.url,
            available,
            observed_at,
        }
    }

    /// One-line human readable text shared by every channel.
    pub fn message(&self) -> String {
        if self.available {
            format!("{} is now in stock at {}: {}", self.product, self.store, self.url)
        } else {
            format!("{} is now out of stock at {}: {}", self.product, self.store, self.url)
        }
    }
}

/// A notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in logs and errors.
    fn name(&self) -> &str;

    async fn notify(&self, ev: &ChangeEvent) -> Result<()>;
}

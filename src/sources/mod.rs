// src/sources/mod.rs
pub mod bestbuy;
pub mod nvidia_api;
pub mod nvidia_search;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, WatchError};

pub use bestbuy::BestBuySource;
pub use nvidia_api::NvidiaApiSource;
pub use nvidia_search::NvidiaSearchSource;

/// Who is being watched, where, and the page a human should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub product: String,
    pub store: String,
    pub url: String,
}

/// One product at one retailer.
///
/// Implementations must not keep state between calls that changes the answer
/// of a later call; each `check_availability` stands on its own.
#[async_trait]
pub trait Source: Send + Sync {
    fn identify(&self) -> Identity;

    /// `Ok(true)` when the product can be bought right now.
    async fn check_availability(&self, client: &Client) -> Result<bool>;
}

/// GET `url` and return the body, mapping every failure to `Transport`.
pub(crate) async fn fetch_body(client: &Client, store: &str, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| WatchError::transport(store, e))?;
    resp.text()
        .await
        .map_err(|e| WatchError::transport(store, e))
}

// src/error.rs
//! Error taxonomy for source queries and sink deliveries.
//!
//! None of these are fatal: the poll cycle logs them and moves on.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatchError {
    /// Request construction, network failure, timeout or non-2xx status.
    #[error("{store}: request failed: {source}")]
    Transport {
        store: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the JSON shape we expected.
    #[error("{store}: unexpected response format: {detail}")]
    ResponseFormat { store: String, detail: String },

    /// Well-formed response, but the sku/zip/store key we asked for is absent.
    #[error("{store}: {detail}")]
    Semantic { store: String, detail: String },

    /// Notification channel rejected or failed to send.
    #[error("{sink} delivery failed: {detail}")]
    SinkDelivery { sink: String, detail: String },
}

impl WatchError {
    pub fn transport(store: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            store: store.to_string(),
            source,
        }
    }

    pub fn format(store: &str, detail: impl Into<String>) -> Self {
        Self::ResponseFormat {
            store: store.to_string(),
            detail: detail.into(),
        }
    }

    pub fn semantic(store: &str, detail: impl Into<String>) -> Self {
        Self::Semantic {
            store: store.to_string(),
            detail: detail.into(),
        }
    }

    pub fn delivery(sink: &str, detail: impl Into<String>) -> Self {
        Self::SinkDelivery {
            sink: sink.to_string(),
            detail: detail.into(),
        }
    }

    /// True for errors raised while querying a source (as opposed to notifying).
    pub fn is_source_error(&self) -> bool {
        !matches!(self, Self::SinkDelivery { .. })
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;

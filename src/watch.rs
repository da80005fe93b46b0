// src/watch.rs
//! One source, its notifiers, and the last availability we saw for it.

use chrono::Utc;
use metrics::counter;
use reqwest::Client;
use std::sync::Arc;

use crate::error::Result;
use crate::notify::{ChangeEvent, Notifier};
use crate::sources::Source;

pub struct WatchEntry {
    source: Box<dyn Source>,
    sinks: Vec<Arc<dyn Notifier>>,
    last_known_available: bool,
}

impl WatchEntry {
    /// A fresh entry assumes "not available" until the first successful check.
    pub fn new(source: Box<dyn Source>, sinks: Vec<Arc<dyn Notifier>>) -> Self {
        Self {
            source,
            sinks,
            last_known_available: false,
        }
    }

    pub fn last_known_available(&self) -> bool {
        self.last_known_available
    }

    pub fn source(&self) -> &dyn Source {
        self.source.as_ref()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Check the source once and fan out a [`ChangeEvent`] if availability flipped.
    ///
    /// The baseline is always updated on success, even when `allow_notify` is
    /// false. On a failed check the baseline is left alone and the error is
    /// returned; nothing is sent. Sink failures are logged and never change
    /// the returned value.
    pub async fn poll(&mut self, client: &Client, allow_notify: bool) -> Result<bool> {
        let id = self.source.identify();
        tracing::debug!(store = %id.store, product = %id.product, "checking availability");
        counter!("stock_checks_total").increment(1);

        let in_stock = match self.source.check_availability(client).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(store = %id.store, product = %id.product, error = %e, "failed to check availability");
                counter!("stock_check_errors_total").increment(1);
                return Err(e);
            }
        };

        let changed = allow_notify && in_stock != self.last_known_available;
        self.last_known_available = in_stock;

        if changed {
            counter!("stock_transitions_total").increment(1);
            tracing::info!(
                store = %id.store,
                product = %id.product,
                available = in_stock,
                "availability changed"
            );

            if !self.sinks.is_empty() {
                let ev = ChangeEvent::new(id, in_stock, Utc::now());
                for sink in &self.sinks {
                    if let Err(e) = sink.notify(&ev).await {
                        tracing::warn!(sink = sink.name(), error = %e, "failed to notify");
                        counter!("sink_errors_total").increment(1);
                    }
                }
            }
        }

        Ok(changed)
    }
}

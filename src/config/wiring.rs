// src/config/wiring.rs
// Turns the parsed config into live sources, notifiers and a scheduler.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use super::{AppConfig, SinkConfig, SourceConfig};
use crate::http::build_client;
use crate::notify::{DiscordNotifier, EmailNotifier, LogNotifier, Notifier, SlackNotifier};
use crate::scheduler::Scheduler;
use crate::sources::{BestBuySource, NvidiaApiSource, NvidiaSearchSource, Source};
use crate::watch::WatchEntry;

impl SourceConfig {
    pub fn build(&self) -> Box<dyn Source> {
        match self {
            Self::BestBuy {
                product,
                sku_id,
                zip,
                store_id,
            } => Box::new(BestBuySource::new(product.clone(), *sku_id, zip.clone(), *store_id)),
            Self::NvidiaSearch {
                product,
                product_sku,
                search,
            } => Box::new(NvidiaSearchSource::new(product.clone(), *product_sku, search.clone())),
            Self::NvidiaApi {
                product,
                id,
                checkout_page,
            } => Box::new(NvidiaApiSource::new(product.clone(), id.clone(), checkout_page.clone())),
        }
    }
}

impl SinkConfig {
    pub fn build(&self, client: &Client, timeout: Duration) -> Result<Arc<dyn Notifier>> {
        let sink: Arc<dyn Notifier> = match self {
            Self::Log => Arc::new(LogNotifier),
            Self::Discord { webhook_url } => {
                Arc::new(DiscordNotifier::new(webhook_url.clone(), client.clone()))
            }
            Self::Slack { webhook_url } => {
                Arc::new(SlackNotifier::new(webhook_url.clone(), client.clone()))
            }
            Self::Email(smtp) => Arc::new(EmailNotifier::new(smtp, timeout)?),
        };
        Ok(sink)
    }
}

impl AppConfig {
    /// Build the shared client, every named sink, and the watch list in config order.
    pub fn build_scheduler(&self) -> Result<Scheduler> {
        let client = build_client(&self.http)?;
        let entries = self.build_entries(&client)?;
        Ok(Scheduler::new(entries, client, self.interval()))
    }

    pub fn build_entries(&self, client: &Client) -> Result<Vec<WatchEntry>> {
        let mut sinks: BTreeMap<&str, Arc<dyn Notifier>> = BTreeMap::new();
        for (name, cfg) in &self.sinks {
            let built = cfg
                .build(client, self.http.timeout())
                .with_context(|| format!("building sink {name}"))?;
            sinks.insert(name.as_str(), built);
        }

        self.watches
            .iter()
            .map(|w| -> Result<WatchEntry> {
                let bound = w
                    .sinks
                    .iter()
                    .map(|n| {
                        sinks
                            .get(n.as_str())
                            .cloned()
                            .ok_or_else(|| anyhow!("unknown sink {n:?}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(WatchEntry::new(w.source.build(), bound))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchConfig;
    use crate::http::HttpConfig;

    #[test]
    fn entries_follow_config_order_and_share_sinks() {
        let mut sinks = BTreeMap::new();
        sinks.insert("log".to_string(), SinkConfig::Log);
        sinks.insert(
            "discord".to_string(),
            SinkConfig::Discord {
                webhook_url: "https://discord.invalid/api/webhooks/1/abc".into(),
            },
        );
        let cfg = AppConfig {
            interval_secs: 10,
            http: HttpConfig::default(),
            sinks,
            watches: vec![
                WatchConfig {
                    source: SourceConfig::BestBuy {
                        product: "RTX 3080".into(),
                        sku_id: 6429440,
                        zip: "80020".into(),
                        store_id: 186,
                    },
                    sinks: vec!["log".into(), "discord".into()],
                },
                WatchConfig {
                    source: SourceConfig::NvidiaSearch {
                        product: "RTX 3080".into(),
                        product_sku: 30042,
                        search: "RTX%203080".into(),
                    },
                    sinks: vec![],
                },
            ],
        };

        let s = cfg.build_scheduler().unwrap();
        let entries = s.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source().identify().store, "Best Buy");
        assert_eq!(entries[0].sink_count(), 2);
        assert_eq!(entries[1].source().identify().store, "NVIDIA Store");
        assert_eq!(entries[1].sink_count(), 0);
        assert_eq!(s.interval(), Duration::from_secs(10));
    }
}

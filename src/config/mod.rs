// src/config/mod.rs
//! Watch list, notifier and transport settings, loaded once at startup.

mod wiring;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpConfig;
use crate::notify::email::SmtpSettings;
use crate::scheduler::DEFAULT_INTERVAL_SECS;

pub const ENV_CONFIG_PATH: &str = "STOCK_WATCH_CONFIG";
pub const ENV_INTERVAL_SECS: &str = "CHECK_INTERVAL_SECS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Seconds to sleep between poll cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub http: HttpConfig,
    /// Named notifiers; watches refer to them by key.
    #[serde(default)]
    pub sinks: BTreeMap<String, SinkConfig>,
    /// Polled in this order every cycle.
    #[serde(default, rename = "watch")]
    pub watches: Vec<WatchConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    Log,
    /// "ENV" means: read from DISCORD_WEBHOOK_URL
    Discord { webhook_url: String },
    /// "ENV" means: read from SLACK_WEBHOOK_URL
    Slack { webhook_url: String },
    Email(SmtpSettings),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    BestBuy {
        product: String,
        sku_id: u64,
        zip: String,
        store_id: u64,
    },
    NvidiaSearch {
        product: String,
        product_sku: i64,
        search: String,
    },
    NvidiaApi {
        product: String,
        id: String,
        checkout_page: String,
    },
}

impl SourceConfig {
    pub fn product(&self) -> &str {
        match self {
            Self::BestBuy { product, .. }
            | Self::NvidiaSearch { product, .. }
            | Self::NvidiaApi { product, .. } => product,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub sinks: Vec<String>,
}

impl AppConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Apply env overrides, resolve "ENV" secrets, sanitize numbers and check
    /// that every sink a watch refers to exists.
    pub fn finalize(mut self) -> Result<Self> {
        if let Some(v) = env_u64(ENV_INTERVAL_SECS) {
            self.interval_secs = v;
        }
        if let Some(v) = env_u64(ENV_HTTP_TIMEOUT_SECS) {
            self.http.timeout_secs = v;
        }

        if self.interval_secs == 0 {
            tracing::warn!("interval_secs = 0, using default {DEFAULT_INTERVAL_SECS}");
            self.interval_secs = DEFAULT_INTERVAL_SECS;
        }
        self.http.timeout_secs = self.http.timeout_secs.max(1);

        for (name, sink) in self.sinks.iter_mut() {
            match sink {
                SinkConfig::Discord { webhook_url } => {
                    resolve_env(webhook_url, "DISCORD_WEBHOOK_URL")
                        .with_context(|| format!("sink {name}"))?;
                }
                SinkConfig::Slack { webhook_url } => {
                    resolve_env(webhook_url, "SLACK_WEBHOOK_URL")
                        .with_context(|| format!("sink {name}"))?;
                }
                SinkConfig::Email(smtp) => {
                    if let Some(pass) = smtp.password.as_mut() {
                        resolve_env(pass, "SMTP_PASS").with_context(|| format!("sink {name}"))?;
                    }
                }
                SinkConfig::Log => {}
            }
        }

        for (i, w) in self.watches.iter().enumerate() {
            if let Some(unknown) = w.sinks.iter().find(|s| !self.sinks.contains_key(s.as_str())) {
                bail!(
                    "watch #{i} ({}) references unknown sink {unknown:?}",
                    w.source.product()
                );
            }
        }
        if self.watches.is_empty() {
            tracing::warn!("config has no [[watch]] entries; nothing will be polled");
        }

        Ok(self)
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing config {}", path.display()))?
        .finalize()
}

/// Load config using env var + fallbacks:
/// 1) $STOCK_WATCH_CONFIG
/// 2) config/watch.toml
/// 3) config/watch.json
pub fn load_config_default() -> Result<AppConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    for candidate in ["config/watch.toml", "config/watch.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_config_from(&p);
        }
    }
    Err(anyhow!(
        "no config found (set {ENV_CONFIG_PATH} or create config/watch.toml)"
    ))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            if let Ok(v) = toml::from_str(s) {
                return Ok(v);
            }
            serde_json::from_str(s).map_err(|_| anyhow!("unsupported config format"))
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn resolve_env(value: &mut String, var: &str) -> Result<()> {
    if value.trim().eq_ignore_ascii_case("env") {
        *value = std::env::var(var).map_err(|_| anyhow!("Missing {var} env var"))?;
    }
    Ok(())
}

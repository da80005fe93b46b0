// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod scheduler;
pub mod sources;
pub mod watch;

// ---- Re-exports for stable public API ----
pub use crate::config::{load_config_default, load_config_from, AppConfig};
pub use crate::error::WatchError;
pub use crate::notify::{ChangeEvent, Notifier};
pub use crate::scheduler::{CycleReport, Phase, Scheduler};
pub use crate::sources::{Identity, Source};
pub use crate::watch::WatchEntry;

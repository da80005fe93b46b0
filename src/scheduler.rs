// src/scheduler.rs
use metrics::{describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

use crate::watch::WatchEntry;

pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// One-time metrics registration (so series carry descriptions once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("stock_checks_total", "Availability checks issued to sources.");
        describe_counter!(
            "stock_check_errors_total",
            "Availability checks that failed (transport, format or missing key)."
        );
        describe_counter!(
            "stock_transitions_total",
            "In-stock / out-of-stock transitions detected after warm-up."
        );
        describe_counter!("sink_errors_total", "Notification deliveries that failed.");
        describe_gauge!(
            "poll_cycle_last_run_ts",
            "Unix ts when the last poll cycle finished."
        );
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First pass: seed every baseline, never notify.
    Warming,
    /// Every later pass: notify on change.
    Steady,
}

/// Outcome of one pass over the watch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub phase: Phase,
    pub checked: usize,
    pub failed: usize,
    pub notified: usize,
}

pub struct Scheduler {
    entries: Vec<WatchEntry>,
    client: Client,
    interval: Duration,
    phase: Phase,
}

impl Scheduler {
    pub fn new(entries: Vec<WatchEntry>, client: Client, interval: Duration) -> Self {
        Self {
            entries,
            client,
            interval,
            phase: Phase::Warming,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    /// Poll every entry once, in registration order.
    ///
    /// The warm-up pass runs with notifications off; afterwards the scheduler
    /// is in [`Phase::Steady`] for good.
    pub async fn run_cycle(&mut self) -> CycleReport {
        ensure_metrics_described();

        let phase = self.phase;
        let allow_notify = phase == Phase::Steady;
        let mut report = CycleReport {
            phase,
            checked: 0,
            failed: 0,
            notified: 0,
        };

        for entry in self.entries.iter_mut() {
            report.checked += 1;
            match entry.poll(&self.client, allow_notify).await {
                Ok(true) => report.notified += 1,
                Ok(false) => {}
                Err(_) => report.failed += 1,
            }
        }

        self.phase = Phase::Steady;
        gauge!("poll_cycle_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

        tracing::info!(
            target: "scheduler",
            phase = ?report.phase,
            checked = report.checked,
            failed = report.failed,
            notified = report.notified,
            "poll cycle done"
        );
        report
    }

    /// Warm up, then poll forever. Only process shutdown ends this.
    pub async fn run(mut self) {
        tracing::info!(
            target: "scheduler",
            entries = self.entries.len(),
            interval_secs = self.interval.as_secs(),
            "starting stock watch"
        );
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}

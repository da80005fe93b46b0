// tests/common/mod.rs
// Scripted sources and recording notifiers shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Arc;

use stock_watch::error::Result;
use stock_watch::{ChangeEvent, Identity, Notifier, Source, WatchError};

/// Replays a fixed list of observations; `None` is a failed check.
pub struct FakeStore {
    name: String,
    results: Mutex<VecDeque<Option<bool>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeStore {
    pub fn new(name: &str, results: &[Option<bool>]) -> Self {
        Self::with_call_log(name, results, Arc::new(Mutex::new(Vec::new())))
    }

    pub fn ok(results: &[bool]) -> Self {
        let scripted: Vec<Option<bool>> = results.iter().copied().map(Some).collect();
        Self::new("FakeStore", &scripted)
    }

    /// Every check pushes `name` onto `calls`, so tests can assert poll order.
    pub fn with_call_log(
        name: &str,
        results: &[Option<bool>],
        calls: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            results: Mutex::new(results.iter().copied().collect()),
            calls,
        }
    }
}

#[async_trait]
impl Source for FakeStore {
    fn identify(&self) -> Identity {
        Identity {
            product: "FakeProduct".into(),
            store: self.name.clone(),
            url: "https://localhost/".into(),
        }
    }

    async fn check_availability(&self, _client: &Client) -> Result<bool> {
        self.calls.lock().push(self.name.clone());
        match self.results.lock().pop_front() {
            Some(Some(v)) => Ok(v),
            Some(None) => Err(WatchError::semantic(&self.name, "sku not found")),
            None => Err(WatchError::format(&self.name, "script exhausted")),
        }
    }
}

/// Records every event it receives; optionally fails after recording.
#[derive(Default)]
pub struct NotifyDetector {
    pub events: Mutex<Vec<ChangeEvent>>,
    pub fail: bool,
}

impl NotifyDetector {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn notified(&self) -> bool {
        self.count() > 0
    }
}

#[async_trait]
impl Notifier for NotifyDetector {
    fn name(&self) -> &str {
        if self.fail {
            "failing-detector"
        } else {
            "detector"
        }
    }

    async fn notify(&self, ev: &ChangeEvent) -> Result<()> {
        self.events.lock().push(ev.clone());
        if self.fail {
            return Err(WatchError::delivery(self.name(), "HTTP 500"));
        }
        Ok(())
    }
}

pub fn sink(d: &Arc<NotifyDetector>) -> Arc<dyn Notifier> {
    d.clone()
}

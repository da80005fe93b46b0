// tests/scheduler_cycle.rs
mod common;

use common::{sink, FakeStore, NotifyDetector};
use parking_lot::Mutex;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use stock_watch::{Phase, Scheduler, WatchEntry};

fn scheduler(entries: Vec<WatchEntry>) -> Scheduler {
    Scheduler::new(entries, Client::new(), Duration::from_millis(1))
}

#[tokio::test]
async fn warm_up_seeds_without_notifying() {
    let detector = Arc::new(NotifyDetector::default());
    let sinks = vec![sink(&detector)];
    let mut s = scheduler(vec![
        WatchEntry::new(Box::new(FakeStore::ok(&[true, true])), sinks.clone()),
        WatchEntry::new(Box::new(FakeStore::ok(&[false, true])), sinks),
    ]);

    let warm = s.run_cycle().await;
    assert_eq!(warm.phase, Phase::Warming);
    assert_eq!((warm.checked, warm.failed, warm.notified), (2, 0, 0));
    assert!(!detector.notified());
    assert_eq!(s.phase(), Phase::Steady);

    let steady = s.run_cycle().await;
    assert_eq!(steady.phase, Phase::Steady);
    assert_eq!((steady.checked, steady.failed, steady.notified), (2, 0, 1));
    assert_eq!(detector.count(), 1);
    assert!(detector.events.lock()[0].available);
}

#[tokio::test]
async fn entries_are_polled_in_registration_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let names = ["Best Buy", "NVIDIA Store", "Micro Center"];
    let entries = names
        .iter()
        .map(|n| {
            let src = FakeStore::with_call_log(n, &[Some(false), Some(false)], calls.clone());
            WatchEntry::new(Box::new(src), Vec::new())
        })
        .collect();
    let mut s = scheduler(entries);

    s.run_cycle().await;
    s.run_cycle().await;

    let expected: Vec<String> = names.iter().chain(names.iter()).map(|n| n.to_string()).collect();
    assert_eq!(*calls.lock(), expected);
}

#[tokio::test]
async fn one_failing_entry_does_not_affect_the_others() {
    let ok_sink = Arc::new(NotifyDetector::default());
    let bad_sink = Arc::new(NotifyDetector::default());
    let mut s = scheduler(vec![
        WatchEntry::new(
            Box::new(FakeStore::new("Broken", &[Some(false), None])),
            vec![sink(&bad_sink)],
        ),
        WatchEntry::new(
            Box::new(FakeStore::ok(&[false, true])),
            vec![sink(&ok_sink)],
        ),
    ]);

    s.run_cycle().await;
    let r = s.run_cycle().await;
    assert_eq!((r.checked, r.failed, r.notified), (2, 1, 1));
    assert!(!s.entries()[0].last_known_available());
    assert!(s.entries()[1].last_known_available());
    assert!(!bad_sink.notified());
    assert_eq!(ok_sink.count(), 1);
}

#[tokio::test]
async fn failing_sink_does_not_abort_the_cycle() {
    let broken = Arc::new(NotifyDetector::failing());
    let after = Arc::new(NotifyDetector::default());
    let mut s = scheduler(vec![
        WatchEntry::new(
            Box::new(FakeStore::ok(&[false, true])),
            vec![sink(&broken)],
        ),
        WatchEntry::new(
            Box::new(FakeStore::ok(&[true, false])),
            vec![sink(&after)],
        ),
    ]);

    s.run_cycle().await;
    let r = s.run_cycle().await;
    assert_eq!(r.notified, 2);
    assert_eq!(r.failed, 0);
    assert_eq!(broken.count(), 1);
    assert_eq!(after.count(), 1);
    assert!(!after.events.lock()[0].available);
}

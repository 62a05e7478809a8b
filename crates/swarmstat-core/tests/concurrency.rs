//! Concurrent updates vs. snapshots: every render must be a consistent view.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Barrier};
use std::thread;

use swarmstat_core::metrics::{render, MetricKind, Registry};

const WRITERS: usize = 4;
const UPDATES_PER_WRITER: usize = 250; // 1000 total
const READERS: usize = 4;
const RENDERS_PER_READER: usize = 25; // 100 total

/// Parse `name{labels} value` lines into (series, value), skipping comments.
fn parse(body: &str) -> Vec<(String, f64)> {
    body.lines()
        .filter(|l| !l.starts_with('#') && !l.is_empty())
        .map(|l| {
            let (series, value) = l.rsplit_once(' ').unwrap();
            (series.to_string(), value.parse::<f64>().unwrap())
        })
        .collect()
}

#[test]
fn interleaved_updates_and_renders_never_tear() {
    let reg = Arc::new(Registry::new());
    reg.describe("ops_total", MetricKind::Counter, "ops").unwrap();
    reg.describe("last_op", MetricKind::Gauge, "last op index").unwrap();

    let start = Arc::new(Barrier::new(WRITERS + READERS));

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let reg = Arc::clone(&reg);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                let worker = w.to_string();
                start.wait();
                for i in 0..UPDATES_PER_WRITER {
                    reg.inc("ops_total", &[("worker", worker.as_str())]).unwrap();
                    // gauge only ever holds a whole index owned by this writer
                    reg.set("last_op", &[("worker", worker.as_str())], i as f64).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let reg = Arc::clone(&reg);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                let mut last_seen: std::collections::HashMap<String, f64> = Default::default();
                for _ in 0..RENDERS_PER_READER {
                    let body = render(&reg.snapshot());
                    for (series, value) in parse(&body) {
                        assert!(value.fract() == 0.0, "torn value {value} for {series}");
                        assert!((0.0..=UPDATES_PER_WRITER as f64).contains(&value));
                        if series.starts_with("ops_total") {
                            let prev = last_seen.insert(series.clone(), value).unwrap_or(0.0);
                            assert!(value >= prev, "counter went backwards for {series}");
                        }
                    }
                }
            })
        })
        .collect();

    for h in writers {
        h.join().unwrap();
    }
    for h in readers {
        h.join().unwrap();
    }

    let snap = reg.snapshot();
    let mut total = 0.0;
    for w in 0..WRITERS {
        let worker = w.to_string();
        let v = snap.value("ops_total", &[("worker", worker.as_str())]).unwrap();
        assert_eq!(v, UPDATES_PER_WRITER as f64);
        total += v;
        assert_eq!(
            snap.value("last_op", &[("worker", worker.as_str())]),
            Some((UPDATES_PER_WRITER - 1) as f64)
        );
    }
    assert_eq!(total, (WRITERS * UPDATES_PER_WRITER) as f64);
}

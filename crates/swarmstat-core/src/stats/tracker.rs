//! In-process statistics tracker.
//!
//! Plays the part of a load generator's live request statistics: folds
//! outcomes into per (endpoint, method) totals and exposes them through
//! [`StatsSource`]. Entries are kept in a `BTreeMap`, so iteration order is
//! sorted by name then method.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use super::outcome::Outcome;
use super::source::{EndpointStats, RunStatus, StatsSource};

#[derive(Debug, Default)]
struct Entry {
    num_requests: u64,
    num_failures: u64,
    total_response_time: f64,
    max_response_time: f64,
    total_content_length: u64,
    last_request_ms: u64,
}

#[derive(Debug)]
struct Inner {
    start_ms: u64,
    entries: BTreeMap<(String, String), Entry>,
    run: RunStatus,
}

pub struct StatsTracker {
    configured_host: Option<String>,
    inner: Mutex<Inner>,
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl StatsTracker {
    /// `configured_host`, when set, overrides whatever host the load
    /// generator reports for site resolution.
    pub fn new(configured_host: Option<String>) -> Self {
        Self::with_start(configured_host, now_ms())
    }

    /// Tracker whose rate window starts at `start_ms`.
    pub fn with_start(configured_host: Option<String>, start_ms: u64) -> Self {
        Self {
            configured_host,
            inner: Mutex::new(Inner {
                start_ms,
                entries: BTreeMap::new(),
                run: RunStatus::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fold one outcome in.
    pub fn log(&self, outcome: &Outcome) {
        let ts = outcome.timestamp_ms.unwrap_or_else(now_ms);
        let mut inner = self.lock();
        let e = inner
            .entries
            .entry((outcome.endpoint.clone(), outcome.method.clone()))
            .or_default();

        e.num_requests += 1;
        if outcome.is_failure() {
            e.num_failures += 1;
        }
        e.total_response_time += outcome.response_time_ms;
        if outcome.response_time_ms > e.max_response_time {
            e.max_response_time = outcome.response_time_ms;
        }
        e.total_content_length = e.total_content_length.saturating_add(outcome.content_length);
        e.last_request_ms = e.last_request_ms.max(ts);
    }

    /// Drop all entries and restart the rate window. Run status is kept.
    pub fn reset(&self) {
        self.reset_at(now_ms());
    }

    pub fn reset_at(&self, start_ms: u64) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.start_ms = start_ms;
    }

    pub fn set_run_status(&self, status: RunStatus) {
        self.lock().run = status;
    }
}

impl StatsSource for StatsTracker {
    fn endpoint_stats(&self) -> Vec<EndpointStats> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .map(|((name, method), e)| {
                let n = e.num_requests as f64;
                let (avg_rt, avg_len) = if e.num_requests == 0 {
                    (0.0, 0.0)
                } else {
                    (e.total_response_time / n, e.total_content_length as f64 / n)
                };
                // Window of at least one second, as the upstream tool computes it.
                let elapsed_ms = e.last_request_ms.saturating_sub(inner.start_ms);
                let window_secs = (elapsed_ms as f64 / 1000.0).max(1.0);
                EndpointStats {
                    name: name.clone(),
                    method: method.clone(),
                    num_requests: e.num_requests,
                    num_failures: e.num_failures,
                    total_rps: n / window_secs,
                    avg_response_time: avg_rt,
                    avg_content_length: avg_len,
                    max_response_time: e.max_response_time,
                }
            })
            .collect()
    }

    fn run_status(&self) -> RunStatus {
        let mut run = self.lock().run.clone();
        if let Some(host) = self.configured_host.as_deref().filter(|h| !h.is_empty()) {
            run.host = Some(host.to_string());
        }
        run
    }
}

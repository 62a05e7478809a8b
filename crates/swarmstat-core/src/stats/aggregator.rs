//! Folds request outcomes and upstream statistics into the registry.
//!
//! Counters (`locust_request_count`, `locust_failed_requests`) are driven by
//! [`Aggregator::record`], one call per outcome. Everything else is a gauge
//! copied from a [`StatsSource`] by [`Aggregator::refresh`]. The only
//! arithmetic is summing the request rate over methods of an endpoint.

use std::sync::Arc;

use crate::error::Result;
use crate::metrics::{MetricKind, Registry};

use super::outcome::Outcome;
use super::source::StatsSource;

pub const REQUEST_COUNT: &str = "locust_request_count";
pub const REQUEST_PER_SECOND: &str = "locust_request_per_second";
pub const FAILED_REQUESTS: &str = "locust_failed_requests";
pub const AVERAGE_RESPONSE: &str = "locust_average_response";
pub const AVERAGE_CONTENT_LENGTH: &str = "locust_average_content_length";
pub const MAX_RESPONSE_TIME: &str = "locust_max_response_time";
pub const RUNNING: &str = "locust_running";
pub const WORKERS: &str = "locust_workers";
pub const USERS: &str = "locust_users";

/// Families in render order.
const FAMILIES: [(&str, MetricKind, &str); 9] = [
    (REQUEST_COUNT, MetricKind::Counter, "Requests sent, per endpoint and method."),
    (REQUEST_PER_SECOND, MetricKind::Gauge, "Requests per second, per endpoint (all methods)."),
    (FAILED_REQUESTS, MetricKind::Counter, "Failed requests, per endpoint and method."),
    (AVERAGE_RESPONSE, MetricKind::Gauge, "Average response time in milliseconds."),
    (AVERAGE_CONTENT_LENGTH, MetricKind::Gauge, "Average response body length in bytes."),
    (MAX_RESPONSE_TIME, MetricKind::Gauge, "Maximum response time in milliseconds."),
    (RUNNING, MetricKind::Gauge, "1 while the test is running, 0 otherwise."),
    (WORKERS, MetricKind::Gauge, "Connected workers, 0 when not distributed."),
    (USERS, MetricKind::Gauge, "Active simulated users."),
];

pub struct Aggregator {
    registry: Arc<Registry>,
}

impl Aggregator {
    /// Declares the `locust_*` families on `registry`.
    pub fn new(registry: Arc<Registry>) -> Result<Self> {
        for (name, kind, help) in FAMILIES {
            registry.describe(name, kind, help)?;
        }
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Count one request (and its failure, if any).
    ///
    /// The failure counter is touched even on success so the series exists
    /// and renders as `0`.
    pub fn record(&self, outcome: &Outcome) -> Result<()> {
        let labels = [
            ("endpoint", outcome.endpoint.as_str()),
            ("method", outcome.method.as_str()),
        ];
        self.registry.inc(REQUEST_COUNT, &labels)?;
        let failed = if outcome.is_failure() { 1.0 } else { 0.0 };
        self.registry.add(FAILED_REQUESTS, &labels, failed)?;
        Ok(())
    }

    /// Copy the source's current gauges into the registry.
    ///
    /// Run-state gauges are only written when a site resolves.
    pub fn refresh(&self, source: &dyn StatsSource) -> Result<()> {
        // rps is labelled by endpoint only: sum it over methods.
        let mut rps: Vec<(String, f64)> = Vec::new();
        for s in source.endpoint_stats() {
            let labels = [("endpoint", s.name.as_str()), ("method", s.method.as_str())];
            self.registry.set(AVERAGE_RESPONSE, &labels, s.avg_response_time)?;
            self.registry
                .set(AVERAGE_CONTENT_LENGTH, &labels, s.avg_content_length)?;
            self.registry.set(MAX_RESPONSE_TIME, &labels, s.max_response_time)?;

            match rps.iter_mut().find(|(name, _)| *name == s.name) {
                Some((_, total)) => *total += s.total_rps,
                None => rps.push((s.name, s.total_rps)),
            }
        }
        for (endpoint, total) in &rps {
            self.registry
                .set(REQUEST_PER_SECOND, &[("endpoint", endpoint.as_str())], *total)?;
        }

        let run = source.run_status();
        match run.site() {
            Some(site) => {
                let labels = [("site", site)];
                let running = if run.is_running() { 1.0 } else { 0.0 };
                self.registry.set(RUNNING, &labels, running)?;
                self.registry.set(WORKERS, &labels, f64::from(run.worker_count()))?;
                self.registry.set(USERS, &labels, run.user_count as f64)?;
            }
            None => {
                tracing::trace!("no host configured or declared; skipping run-state gauges");
            }
        }
        Ok(())
    }
}

//! Probe metric families.
//!
//! Mirrors what a `prometheus_client` pinger exposes: a counter per response
//! status and a duration summary (`_count`/`_sum`), plus a failure counter by
//! reason.

use std::sync::Arc;
use std::time::Duration;

use swarmstat_core::error::Result;
use swarmstat_core::metrics::{MetricKind, Registry};

pub const PROBE_REQUESTS: &str = "probe_requests_total";
pub const PROBE_FAILURES: &str = "probe_failures_total";
pub const PROCESSING_COUNT: &str = "request_processing_seconds_count";
pub const PROCESSING_SUM: &str = "request_processing_seconds_sum";

/// `status` label used when no HTTP response came back.
pub const STATUS_ERROR: &str = "error";

pub struct ProbeMetrics {
    registry: Arc<Registry>,
}

impl ProbeMetrics {
    pub fn new(registry: Arc<Registry>) -> Result<Self> {
        registry.describe(
            PROBE_REQUESTS,
            MetricKind::Counter,
            "Probe requests by response status ('error' when the request failed).",
        )?;
        registry.describe(
            PROBE_FAILURES,
            MetricKind::Counter,
            "Probe requests that got no response, by reason.",
        )?;
        registry.describe(
            PROCESSING_COUNT,
            MetricKind::Counter,
            "Number of timed probe requests.",
        )?;
        registry.describe(
            PROCESSING_SUM,
            MetricKind::Counter,
            "Total time spent in probe requests, in seconds.",
        )?;
        Ok(Self { registry })
    }

    /// A response came back with `status`.
    pub fn record_status(&self, status: u16, elapsed: Duration) -> Result<()> {
        let status = status.to_string();
        self.registry.inc(PROBE_REQUESTS, &[("status", status.as_str())])?;
        self.observe(elapsed)
    }

    /// The request failed before a response arrived.
    pub fn record_failure(&self, reason: &str, elapsed: Duration) -> Result<()> {
        self.registry.inc(PROBE_REQUESTS, &[("status", STATUS_ERROR)])?;
        self.registry.inc(PROBE_FAILURES, &[("reason", reason)])?;
        self.observe(elapsed)
    }

    fn observe(&self, elapsed: Duration) -> Result<()> {
        self.registry.inc(PROCESSING_COUNT, &[])?;
        self.registry.add(PROCESSING_SUM, &[], elapsed.as_secs_f64())
    }
}

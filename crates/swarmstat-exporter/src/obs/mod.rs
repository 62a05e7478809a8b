//! Metric families owned by the exporter itself (the probe's families).
//! Load-test families live in `swarmstat_core::stats::aggregator`.

pub mod metrics;

pub use metrics::ProbeMetrics;

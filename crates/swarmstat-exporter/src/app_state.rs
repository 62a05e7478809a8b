//! Shared application state for the exporter.
//!
//! One `Registry` is built here and injected into every producer (aggregator,
//! probe loop) and into the scrape handler. No global singleton.

use std::sync::Arc;

use swarmstat_core::error::Result;
use swarmstat_core::metrics::Registry;
use swarmstat_core::stats::{Aggregator, StatsTracker};

use crate::config::ExporterConfig;
use crate::obs::ProbeMetrics;

/// Load-test statistics pipeline: tracker (source of truth) + aggregator.
pub struct StatsPipeline {
    pub tracker: StatsTracker,
    pub aggregator: Aggregator,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<Registry>,
    stats: Option<Arc<StatsPipeline>>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// Build application state with a fresh registry.
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        Self::with_registry(cfg, Arc::new(Registry::new()))
    }

    pub fn with_registry(cfg: ExporterConfig, registry: Arc<Registry>) -> Result<Self> {
        let stats = if cfg.exporter.enabled {
            let aggregator = Aggregator::new(Arc::clone(&registry))?;
            let tracker = StatsTracker::new(cfg.exporter.host.clone());
            Some(Arc::new(StatsPipeline {
                tracker,
                aggregator,
            }))
        } else {
            None
        };

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            registry,
            stats,
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn stats(&self) -> Option<Arc<StatsPipeline>> {
        self.stats.clone()
    }

    /// Probe families registered on the shared registry.
    pub fn probe_metrics(&self) -> Result<ProbeMetrics> {
        ProbeMetrics::new(self.registry())
    }
}

//! Periodic probe task.
//!
//! Each interval: WAIT for the tick, FIRE one request, RECORD the result.
//! A failed request is recorded like any other outcome. A missing target
//! skips FIRE/RECORD for that tick; the loop itself only ends on the stop
//! signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::ProbeSection;
use crate::obs::ProbeMetrics;

use super::prober::{FailureReason, Prober};

/// Where the probe URL comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeTarget {
    Fixed(String),
    /// Name of an environment variable, read on every tick.
    Env(String),
}

impl ProbeTarget {
    pub fn from_config(cfg: &ProbeSection) -> Self {
        match &cfg.target_url {
            Some(url) => ProbeTarget::Fixed(url.clone()),
            None => ProbeTarget::Env(cfg.target_env.clone()),
        }
    }

    /// Current URL; empty values count as unset.
    pub fn resolve(&self) -> Option<String> {
        let url = match self {
            ProbeTarget::Fixed(url) => Some(url.clone()),
            ProbeTarget::Env(var) => std::env::var(var).ok(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    fn describe(&self) -> String {
        match self {
            ProbeTarget::Fixed(_) => "probe.target_url".to_string(),
            ProbeTarget::Env(var) => format!("${var}"),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No target configured; nothing fired.
    Skipped,
    Status(u16),
    Failed(FailureReason),
}

pub struct ProbeLoop {
    prober: Arc<dyn Prober>,
    target: ProbeTarget,
    interval: Duration,
    metrics: ProbeMetrics,
}

impl ProbeLoop {
    pub fn new(
        prober: Arc<dyn Prober>,
        target: ProbeTarget,
        interval: Duration,
        metrics: ProbeMetrics,
    ) -> Self {
        Self {
            prober,
            target,
            interval,
            metrics,
        }
    }

    /// FIRE + RECORD once.
    pub async fn tick(&self) -> TickOutcome {
        let Some(url) = self.target.resolve() else {
            let source = self.target.describe();
            tracing::warn!(%source, "probe target is not set; skipping");
            return TickOutcome::Skipped;
        };

        let started = Instant::now();
        let result = self.prober.probe(&url).await;
        let elapsed = started.elapsed();

        let (outcome, recorded) = match result {
            Ok(status) => {
                tracing::debug!(%url, status, ?elapsed, "probe ok");
                (TickOutcome::Status(status), self.metrics.record_status(status, elapsed))
            }
            Err(reason) => {
                tracing::warn!(%url, reason = reason.as_str(), ?elapsed, "probe failed");
                (
                    TickOutcome::Failed(reason),
                    self.metrics.record_failure(reason.as_str(), elapsed),
                )
            }
        };
        if let Err(e) = recorded {
            tracing::error!(error = %e, "failed to record probe outcome");
        }
        outcome
    }

    /// Run until `shutdown` turns true (or its sender is dropped).
    /// The first tick fires immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval = ?self.interval, "probe loop started");

        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                _ = self.tick() => {}
            }
        }

        tracing::info!("probe loop stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

async fn stopped(rx: &mut watch::Receiver<bool>) {
    // Err means the sender is gone, which is also a stop.
    let _ = rx.wait_for(|stop| *stop).await;
}

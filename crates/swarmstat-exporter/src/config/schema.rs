use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use swarmstat_core::error::{Result, SwarmStatError};

/// Prefix reserved for the ingest API.
pub const INGEST_PREFIX: &str = "/v1/";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub exporter: StatsSection,

    #[serde(default)]
    pub probe: ProbeSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            exporter: StatsSection::default(),
            probe: ProbeSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SwarmStatError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.probe.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.metrics_path.starts_with('/') {
            return Err(SwarmStatError::BadRequest(
                "server.metrics_path must start with '/'".into(),
            ));
        }
        if self.metrics_path.starts_with(INGEST_PREFIX) {
            return Err(SwarmStatError::BadRequest(format!(
                "server.metrics_path must not live under {INGEST_PREFIX}"
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SwarmStatError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

/// Load-test statistics (aggregator variant).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Explicit host for the `site` label. Overrides the host reported by
    /// the load generator.
    #[serde(default)]
    pub host: Option<String>,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            host: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fixed target. When unset the URL is read from `target_env` on every tick.
    #[serde(default)]
    pub target_url: Option<String>,

    #[serde(default = "default_target_env")]
    pub target_env: String,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            enabled: true,
            target_url: None,
            target_env: default_target_env(),
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ProbeSection {
    pub fn validate(&self) -> Result<()> {
        if !(10..=3_600_000).contains(&self.interval_ms) {
            return Err(SwarmStatError::BadRequest(
                "probe.interval_ms must be between 10 and 3600000".into(),
            ));
        }
        if !(1..=120_000).contains(&self.timeout_ms) {
            return Err(SwarmStatError::BadRequest(
                "probe.timeout_ms must be between 1 and 120000".into(),
            ));
        }
        if self.target_url.is_none() && self.target_env.is_empty() {
            return Err(SwarmStatError::BadRequest(
                "probe.target_env must not be empty when probe.target_url is unset".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_true() -> bool {
    true
}
fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_target_env() -> String {
    "PING_URL".into()
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_timeout_ms() -> u64 {
    5000
}

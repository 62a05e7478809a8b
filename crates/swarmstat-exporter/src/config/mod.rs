//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use swarmstat_core::error::{Result, SwarmStatError};

pub use schema::{ExporterConfig, ProbeSection, ServerSection, StatsSection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "SWARMSTAT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "swarmstat.yaml";

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| SwarmStatError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the file at `path`, falling back to defaults when it does not exist.
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: &str) -> Result<ExporterConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found; using defaults");
            Ok(ExporterConfig::default())
        }
        Err(e) => Err(SwarmStatError::Internal(format!("read config failed: {e}"))),
    }
}

//! Read interface of the upstream statistics source.

use serde::{Deserialize, Serialize};

/// Aggregates for one endpoint + method, computed by the source.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointStats {
    pub name: String,
    pub method: String,
    pub num_requests: u64,
    pub num_failures: u64,
    pub total_rps: f64,
    pub avg_response_time: f64,
    pub avg_content_length: f64,
    pub max_response_time: f64,
}

/// Lifecycle state of a load-test run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Ready,
    #[serde(alias = "hatching")]
    Spawning,
    Running,
    Stopped,
}

/// A registered user scenario and the host it declares, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
}

/// Global run status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunStatus {
    #[serde(default)]
    pub state: RunState,
    /// Connected workers; `None` when the run is not distributed.
    #[serde(default)]
    pub workers: Option<u32>,
    #[serde(default)]
    pub user_count: u64,
    /// Host the run was explicitly started against.
    #[serde(default)]
    pub host: Option<String>,
    /// Scenarios in registration order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn worker_count(&self) -> u32 {
        self.workers.unwrap_or(0)
    }

    /// The `site` label for run-state gauges. See [`resolve_site`].
    pub fn site(&self) -> Option<&str> {
        resolve_site(self.host.as_deref(), &self.scenarios)
    }
}

/// Site resolution: explicit host, else the first scenario's declared host,
/// else nothing. Empty strings count as unset.
pub fn resolve_site<'a>(host: Option<&'a str>, scenarios: &'a [Scenario]) -> Option<&'a str> {
    fn non_empty(h: Option<&str>) -> Option<&str> {
        h.filter(|s| !s.is_empty())
    }
    non_empty(host).or_else(|| {
        scenarios
            .first()
            .and_then(|s| non_empty(s.host.as_deref()))
    })
}

/// Anything that can report live load-test statistics.
pub trait StatsSource: Send + Sync {
    /// Per endpoint + method, in a stable order.
    fn endpoint_stats(&self) -> Vec<EndpointStats>;
    fn run_status(&self) -> RunStatus;
}

//! Per-request outcome events emitted by a load generator.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwarmStatError};

/// One finished request. Consumed once, never stored verbatim.
///
/// Failure is taken from `failed` when present, otherwise from `status >= 400`.
/// An outcome with neither is a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outcome {
    /// Endpoint name or URL path, e.g. `/login`.
    pub endpoint: String,
    pub method: String,
    #[serde(default)]
    pub response_time_ms: f64,
    #[serde(default)]
    pub content_length: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    /// Unix epoch milliseconds; the receiver's clock is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl Outcome {
    pub fn success(
        endpoint: &str,
        method: &str,
        response_time_ms: f64,
        content_length: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            response_time_ms,
            content_length,
            status: None,
            failed: Some(false),
            timestamp_ms: None,
        }
    }

    pub fn failure(endpoint: &str, method: &str, response_time_ms: f64) -> Self {
        Self {
            failed: Some(true),
            ..Self::success(endpoint, method, response_time_ms, 0)
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn is_failure(&self) -> bool {
        match self.failed {
            Some(f) => f,
            None => self.status.is_some_and(|s| s >= 400),
        }
    }

    /// Reject events that would poison the aggregates.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(SwarmStatError::BadRequest("outcome.endpoint must not be empty".into()));
        }
        if self.method.is_empty() {
            return Err(SwarmStatError::BadRequest("outcome.method must not be empty".into()));
        }
        if !(self.response_time_ms.is_finite() && self.response_time_ms >= 0.0) {
            return Err(SwarmStatError::BadRequest(
                "outcome.response_time_ms must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

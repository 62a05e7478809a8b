use std::time::Duration;

use async_trait::async_trait;
use swarmstat_core::error::{Result, SwarmStatError};

/// Why a probe got no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Timeout,
    Connect,
    Other,
}

impl FailureReason {
    /// Value of the `reason` label.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::Connect => "connect",
            FailureReason::Other => "other",
        }
    }
}

/// HTTP status on success, failure reason otherwise.
pub type ProbeResult = std::result::Result<u16, FailureReason>;

/// One outbound request. Implementations must bound their own duration.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// `GET url` via reqwest with a mandatory whole-request timeout.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(SwarmStatError::BadRequest("probe timeout must be non-zero".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SwarmStatError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        match self.client.get(url).send().await {
            Ok(resp) => Ok(resp.status().as_u16()),
            Err(e) if e.is_timeout() => Err(FailureReason::Timeout),
            Err(e) if e.is_connect() => Err(FailureReason::Connect),
            Err(e) => {
                tracing::debug!(error = %e, "probe request failed");
                Err(FailureReason::Other)
            }
        }
    }
}

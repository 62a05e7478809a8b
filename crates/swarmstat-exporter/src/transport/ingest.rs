//! Ingest API for an out-of-process load generator.
//!
//! - `POST /v1/outcomes`: JSON array of outcomes
//! - `PUT /v1/run`: JSON run status
//! - `POST /v1/stats/reset`: restart the stats window
//!
//! Every call refreshes the forwarded gauges afterwards, so scrapes stay
//! read-only.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use swarmstat_core::error::{ErrorCode, Result, SwarmStatError};
use swarmstat_core::stats::{Outcome, RunStatus};

use crate::app_state::{AppState, StatsPipeline};

/// Error response: `{"code": ..., "msg": ...}`.
pub struct ApiError(SwarmStatError);

impl From<SwarmStatError> for ApiError {
    fn from(e: SwarmStatError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let status = match code {
            ErrorCode::BadRequest | ErrorCode::InvalidName => StatusCode::BAD_REQUEST,
            ErrorCode::ConfigurationMissing => StatusCode::NOT_FOUND,
            ErrorCode::InvalidDelta
            | ErrorCode::KindMismatch
            | ErrorCode::UnsupportedVersion
            | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "ingest failed");
        } else {
            tracing::debug!(error = %self.0, "ingest rejected");
        }
        let body = json!({ "code": code.as_str(), "msg": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

fn pipeline(app: &AppState) -> Result<std::sync::Arc<StatsPipeline>> {
    app.stats()
        .ok_or_else(|| SwarmStatError::ConfigurationMissing("load-test stats are disabled".into()))
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| SwarmStatError::BadRequest(format!("invalid json: {e}")))
}

pub async fn post_outcomes(
    State(app): State<AppState>,
    body: Bytes,
) -> std::result::Result<(StatusCode, Json<Value>), ApiError> {
    let stats = pipeline(&app)?;
    let outcomes: Vec<Outcome> = parse(&body)?;
    // validate the whole batch before applying any of it
    for o in &outcomes {
        o.validate()?;
    }

    for o in &outcomes {
        stats.tracker.log(o);
        stats.aggregator.record(o)?;
    }
    stats.aggregator.refresh(&stats.tracker)?;

    tracing::debug!(accepted = outcomes.len(), "outcomes ingested");
    Ok((StatusCode::ACCEPTED, Json(json!({ "accepted": outcomes.len() }))))
}

pub async fn put_run(
    State(app): State<AppState>,
    body: Bytes,
) -> std::result::Result<StatusCode, ApiError> {
    let stats = pipeline(&app)?;
    let status: RunStatus = parse(&body)?;
    tracing::info!(
        state = ?status.state,
        users = status.user_count,
        workers = ?status.workers,
        "run status updated"
    );
    stats.tracker.set_run_status(status);
    stats.aggregator.refresh(&stats.tracker)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_reset(State(app): State<AppState>) -> std::result::Result<StatusCode, ApiError> {
    let stats = pipeline(&app)?;
    stats.tracker.reset();
    stats.aggregator.refresh(&stats.tracker)?;
    tracing::info!("stats reset");
    Ok(StatusCode::NO_CONTENT)
}

//! `GET /metrics`: snapshot the registry and render it.
//!
//! Read-only. Concurrent scrapes share nothing but the registry's shard read
//! locks, so they never wait on each other.

use axum::{extract::State, http::header, response::IntoResponse};

use swarmstat_core::metrics::{render, CONTENT_TYPE};

use crate::app_state::AppState;

pub async fn metrics(State(app): State<AppState>) -> impl IntoResponse {
    let body = render(&app.registry().snapshot());
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}

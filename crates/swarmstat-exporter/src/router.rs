//! Axum router wiring.
//!
//! Always exposes the scrape route; the ingest API is mounted only when
//! load-test stats are enabled.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().server.metrics_path.clone();
    let mut router: Router<AppState> =
        Router::new().route(&metrics_path, get(transport::scrape::metrics));

    if state.stats().is_some() {
        router = router
            .route("/v1/outcomes", post(transport::ingest::post_outcomes))
            .route("/v1/run", put(transport::ingest::put_run))
            .route("/v1/stats/reset", post(transport::ingest::post_reset));
    }

    router.with_state(state)
}

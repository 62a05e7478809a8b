//! Router-level tests via `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use futures_util::future::join_all;
use http_body_util::BodyExt as _;
use serde_json::{json, Value};
use tower::ServiceExt;

use swarmstat_exporter::{app_state::AppState, config, router};

fn app_from(yaml: &str) -> (AppState, Router) {
    let cfg = config::load_from_str(yaml).unwrap();
    let state = AppState::new(cfg).unwrap();
    let app = router::build_router(state.clone());
    (state, app)
}

fn app() -> (AppState, Router) {
    app_from("version: 1\n")
}

async fn scrape(app: &Router, path: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder().method("GET").uri(path).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, ct, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let v = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, v)
}

#[tokio::test]
async fn empty_registry_scrapes_ok_with_text_content_type() {
    let (_, app) = app();
    let (status, ct, body) = scrape(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ct.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "");
}

#[tokio::test]
async fn ingested_outcome_shows_up_in_scrape() {
    let (_, app) = app();
    let (status, v) = send_json(
        &app,
        "POST",
        "/v1/outcomes",
        json!([{
            "endpoint": "/login",
            "method": "GET",
            "response_time_ms": 120,
            "content_length": 512,
            "failed": false
        }]),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(v["accepted"], 1);

    let (_, _, body) = scrape(&app, "/metrics").await;
    assert!(body.contains("locust_request_count{endpoint=\"/login\", method=\"GET\"} 1\n"));
    assert!(body.contains("locust_failed_requests{endpoint=\"/login\", method=\"GET\"} 0\n"));
    assert!(body.contains("locust_average_response{endpoint=\"/login\", method=\"GET\"} 120\n"));
    assert!(!body.contains("locust_running"));
}

#[tokio::test]
async fn run_status_adds_site_gauges() {
    let (_, app) = app();
    let (status, _) = send_json(
        &app,
        "PUT",
        "/v1/run",
        json!({
            "state": "running",
            "workers": 2,
            "user_count": 25,
            "scenarios": [{ "name": "WebsiteUser", "host": "https://loadtestsiteexample.com" }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = scrape(&app, "/metrics").await;
    assert!(body.contains("locust_running{site=\"https://loadtestsiteexample.com\"} 1\n"));
    assert!(body.contains("locust_workers{site=\"https://loadtestsiteexample.com\"} 2\n"));
    assert!(body.contains("locust_users{site=\"https://loadtestsiteexample.com\"} 25\n"));
}

#[tokio::test]
async fn configured_host_is_used_when_run_reports_none() {
    let (_, app) = app_from("version: 1\nexporter:\n  host: \"https://configured\"\n");
    let (status, _) = send_json(&app, "PUT", "/v1/run", json!({ "state": "stopped" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = scrape(&app, "/metrics").await;
    assert!(body.contains("locust_running{site=\"https://configured\"} 0\n"));
    assert!(body.contains("locust_workers{site=\"https://configured\"} 0\n"));
}

#[tokio::test]
async fn configured_host_overrides_reported_host() {
    let (_, app) = app_from("version: 1\nexporter:\n  host: \"https://configured\"\n");
    let run = json!({ "state": "running", "user_count": 3, "host": "https://reported" });
    let (status, _) = send_json(&app, "PUT", "/v1/run", run).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = scrape(&app, "/metrics").await;
    assert!(body.contains("locust_users{site=\"https://configured\"} 3\n"));
    assert!(!body.contains("https://reported"));
}

#[tokio::test]
async fn malformed_batch_is_rejected_whole() {
    let (state, app) = app();
    let (status, v) = send_json(
        &app,
        "POST",
        "/v1/outcomes",
        json!([
            { "endpoint": "/ok", "method": "GET", "response_time_ms": 1 },
            { "endpoint": "/bad", "method": "GET", "response_time_ms": -3 }
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "BAD_REQUEST");
    assert!(state.registry().is_empty());

    let (status, v) = send_json(&app, "POST", "/v1/outcomes", json!({ "not": "an array" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn reset_keeps_counters() {
    let (state, app) = app();
    let batch = json!([{ "endpoint": "/a", "method": "GET", "response_time_ms": 5 }]);
    send_json(&app, "POST", "/v1/outcomes", batch.clone()).await;
    send_json(&app, "POST", "/v1/outcomes", batch).await;

    let req = Request::builder().method("POST").uri("/v1/stats/reset").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let snap = state.registry().snapshot();
    assert_eq!(
        snap.value("locust_request_count", &[("endpoint", "/a"), ("method", "GET")]),
        Some(2.0)
    );
}

#[tokio::test]
async fn ingest_routes_absent_when_stats_disabled() {
    let (_, app) = app_from("version: 1\nexporter:\n  enabled: false\n");
    let (status, _) = send_json(&app, "POST", "/v1/outcomes", json!([])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = scrape(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn custom_metrics_path() {
    let (_, app) = app_from("version: 1\nserver:\n  metrics_path: \"/scrape\"\n");
    assert_eq!(scrape(&app, "/scrape").await.0, StatusCode::OK);
    assert_eq!(scrape(&app, "/metrics").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_scrapes_and_ingest() {
    let (_, app) = app();
    let ingests = (0..20).map(|i| {
        let app = app.clone();
        async move {
            let ep = format!("/e{}", i % 4);
            send_json(
                &app,
                "POST",
                "/v1/outcomes",
                json!([{ "endpoint": ep, "method": "GET", "response_time_ms": 10 }]),
            )
            .await
            .0
        }
    });
    let scrapes = (0..20).map(|_| {
        let app = app.clone();
        async move { scrape(&app, "/metrics").await.0 }
    });

    let (a, b) = tokio::join!(join_all(ingests), join_all(scrapes));
    assert!(a.iter().all(|s| *s == StatusCode::ACCEPTED));
    assert!(b.iter().all(|s| *s == StatusCode::OK));

    let (_, _, body) = scrape(&app, "/metrics").await;
    for i in 0..4 {
        let line = format!("locust_request_count{{endpoint=\"/e{i}\", method=\"GET\"}} 5\n");
        assert!(body.contains(&line), "missing {line:?} in\n{body}");
    }
}

//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use crossroads_core::clock::Clock;
use crossroads_core::report::ProgressReporter;
use crossroads_test_support::{FixedClock, RecordingReporter, fixtures};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crossroads_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app over the two-situation fixture bundle with a
/// recording reporter.
pub fn build_test_app() -> Router {
    build_test_app_with_reporter(Arc::new(RecordingReporter::new()))
}

/// Build the full app with a custom reporter.
pub fn build_test_app_with_reporter(reporter: Arc<dyn ProgressReporter>) -> Router {
    let app_state = AppState::new(fixtures::scenario_bundle(), fixed_clock(), reporter);
    crossroads_api::app(app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Open situation `index`, play its script to the end, pick `option` and
/// confirm. Returns the confirmation response.
pub async fn answer(app: &Router, index: usize, option: usize) -> (StatusCode, serde_json::Value) {
    post_empty(app.clone(), &format!("/api/v1/situations/{index}/open")).await;
    post_json(
        app.clone(),
        "/api/v1/session/advance",
        &serde_json::json!({ "elapsed": 60.0 }),
    )
    .await;
    post_json(
        app.clone(),
        "/api/v1/session/select",
        &serde_json::json!({ "option": option }),
    )
    .await;
    post_empty(app.clone(), "/api/v1/session/confirm").await
}

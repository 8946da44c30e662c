//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;
use whitelist_applications::domain::lifecycle::LifecycleConfig;
use whitelist_core::authorization::AllowList;
use whitelist_store::SqliteApplicationRepository;
use whitelist_test_support::{FixedClock, RecordingNotifier};

use whitelist_api::routes;
use whitelist_api::state::AppState;

/// The only administrator in test deployments.
pub const ADMIN_ID: i64 = 42;

/// A valid SteamID64.
pub const STEAM_ID: &str = "76561198000000000";

/// State backed by a real SQLite repository, a fixed clock, a recording
/// notifier and a single administrator.
pub fn test_state(pool: SqlitePool) -> AppState {
    AppState::new(
        Arc::new(SqliteApplicationRepository::new(pool)),
        Arc::new(FixedClock::standard()),
        Arc::new(RecordingNotifier::new()),
        Arc::new(AllowList::new([ADMIN_ID])),
        LifecycleConfig::default(),
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(pool: SqlitePool) -> Router {
    routes::app(test_state(pool))
}

/// A PC submission body.
pub fn pc_submission(submitter_id: i64, game_identifier: &str) -> Value {
    json!({
        "submitter_id": submitter_id,
        "display_name": "Alaric",
        "game_identifier": game_identifier,
        "platform": "PC",
        "external_account_id": STEAM_ID
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn json_request(method: &str, uri: &str, actor: Option<i64>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header("x-actor-id", actor.to_string());
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, json_request("POST", uri, None, Some(body))).await
}

/// Send a POST request as `actor` and return the response.
pub async fn post_json_as(app: Router, uri: &str, actor: i64, body: &Value) -> (StatusCode, Value) {
    send(app, json_request("POST", uri, Some(actor), Some(body))).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, json_request("GET", uri, None, None)).await
}

/// Send a GET request as `actor` and return the response.
pub async fn get_json_as(app: Router, uri: &str, actor: i64) -> (StatusCode, Value) {
    send(app, json_request("GET", uri, Some(actor), None)).await
}

/// Send a GET request and return status, content type and body text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(json_request("GET", uri, None, None))
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, content_type, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Submits a PC application and returns its id.
pub async fn submit(pool: &SqlitePool, submitter_id: i64, game_identifier: &str) -> i64 {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        "/api/v1/applications",
        &pc_submission(submitter_id, game_identifier),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["id"].as_i64().unwrap()
}

/// Records an administrator decision and returns the response.
pub async fn decide(pool: &SqlitePool, application_id: i64, decision: &str) -> (StatusCode, Value) {
    post_json_as(
        build_test_app(pool.clone()),
        &format!("/api/v1/applications/{application_id}/decision"),
        ADMIN_ID,
        &json!({ "decision": decision, "comment": "checked by staff" }),
    )
    .await
}

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use dealflow::{config::Config, create_app, db, seed, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const CATALOG_SIZE: usize = 60;

/// Fresh in-memory database with a seeded catalog; rate limiting off.
pub async fn test_state() -> AppState {
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        rate_limit_per_minute: None,
        seed_on_start: false,
        ..Config::default()
    };
    let conn = db::connect(&config.database_url).await.unwrap();
    let state = AppState::new(conn, config).unwrap();
    seed::insert_companies(
        &state.db,
        state.embedder.as_ref(),
        seed::generate_catalog(CATALOG_SIZE),
    )
    .await
    .unwrap();
    state
}

pub async fn test_app() -> Router {
    create_app(test_state().await)
}

/// Sends a request and returns the status plus the JSON body (`Null` when empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(json) => send_raw(app, method, uri, Some("application/json"), json.to_string()).await,
        None => send_raw(app, method, uri, None, String::new()).await,
    }
}

/// Like `send`, but the body is sent verbatim with an optional content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

#![allow(dead_code)]

use std::sync::Arc;

use audiowave_api::config::ApiConfig;
use audiowave_api::http;
use audiowave_api::state::AppState;
use audiowave_api::store::MemoryStore;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Full router over a fresh in-memory store with default configuration.
pub fn build_test_app() -> Router {
    build_test_app_with(ApiConfig::default())
}

pub fn build_test_app_with(config: ApiConfig) -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), &config);
    http::router(state, &config.cors).expect("router builds")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers a user and returns the created profile body.
pub async fn register(app: &Router, username: &str, wallet: &str) -> Value {
    let response = post_json(
        app,
        "/api/auth/register",
        serde_json::json!({ "username": username, "walletAddress": wallet }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

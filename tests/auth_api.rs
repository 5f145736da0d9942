//! Registration, login and profile lookup over HTTP.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, post_json, register};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_returns_ok() {
    let app = common::build_test_app();
    let response = get(&app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn readiness_reports_backend() {
    let app = common::build_test_app();
    let response = get(&app, "/api/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn register_returns_created_profile_with_defaults() {
    let app = common::build_test_app();
    let profile = register(&app, "alice_01", "0xABC").await;

    assert_eq!(profile["username"], "alice_01");
    assert_eq!(profile["walletAddress"], "0xABC");
    assert_eq!(profile["followers"], 0);
    assert_eq!(profile["streams"], 0);
    assert_eq!(profile["gems"], 0);
    assert_eq!(
        profile["profilePicture"],
        "https://api.dicebear.com/7.x/avatars/svg?seed=alice_01"
    );
    assert!(profile["createdAt"].is_string());
    assert!(profile["id"].is_number());
}

#[tokio::test]
async fn register_then_login_returns_same_identity() {
    let app = common::build_test_app();
    let created = register(&app, "alice_01", "0xABC").await;

    let response = post_json(&app, "/api/auth/login", json!({ "walletAddress": "0xABC" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile, created);
}

#[tokio::test]
async fn duplicate_wallet_is_rejected() {
    let app = common::build_test_app();
    register(&app, "alice_01", "0xABC").await;

    let response = post_json(
        &app,
        "/api/auth/register",
        json!({ "username": "bob", "walletAddress": "0xABC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Wallet address already registered"
    );
}

#[tokio::test]
async fn duplicate_username_ignores_case() {
    let app = common::build_test_app();
    register(&app, "alice_01", "0xABC").await;

    let response = post_json(
        &app,
        "/api/auth/register",
        json!({ "username": "Alice_01", "walletAddress": "0xDEF" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Username already taken");
}

#[tokio::test]
async fn invalid_username_reports_field() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/auth/register",
        json!({ "username": "al", "walletAddress": "0xABC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid input data");
    assert_eq!(body["errors"][0]["field"], "username");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = common::build_test_app();
    let response = post_json(&app, "/api/auth/register", json!({ "username": "alice" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid input data");
}

#[tokio::test]
async fn login_unknown_wallet_is_404() {
    let app = common::build_test_app();
    let response = post_json(&app, "/api/auth/login", json!({ "walletAddress": "0xNOPE" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn profile_resolves_by_username_case_insensitively() {
    let app = common::build_test_app();
    let created = register(&app, "alice_01", "0xABC").await;

    for identifier in ["alice_01", "ALICE_01", "0xABC"] {
        let response = get(&app, &format!("/api/users/{identifier}")).await;
        assert_eq!(response.status(), StatusCode::OK, "lookup by {identifier}");
        assert_eq!(body_json(response).await, created);
    }

    let response = get(&app, "/api/users/nobody").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let app = common::build_test_app();
    let preflight = |origin: &'static str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/auth/login")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(preflight("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );

    let denied = app
        .clone()
        .oneshot(preflight("https://evil.example"))
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn wallet_lookup_does_not_hide_later_username() {
    let app = common::build_test_app();
    let holder = register(&app, "dave", "erin").await;
    assert_eq!(body_json(get(&app, "/api/users/erin").await).await, holder);

    let erin = register(&app, "erin", "0xE").await;
    assert_eq!(body_json(get(&app, "/api/users/erin").await).await, erin);
}

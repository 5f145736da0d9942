//! Track metadata and server-side upvote/gem interactions over HTTP.

mod common;

use audiowave_api::config::ApiConfig;
use axum::Router;
use axum::http::StatusCode;
use common::{body_json, get, post_json, register};
use serde_json::{Value, json};

async fn create_track(app: &Router, title: &str) -> Value {
    let response = post_json(
        app,
        "/api/tracks",
        json!({ "title": title, "audioUrl": format!("ipfs://{title}") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn track_metadata_roundtrip() {
    let app = common::build_test_app();
    let created = create_track(&app, "night-drive").await;
    assert_eq!(created["upvotes"], 0);
    assert_eq!(created["gems"], 0);

    let id = created["id"].as_i64().unwrap();
    let response = get(&app, &format!("/api/tracks/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = get(&app, "/api/tracks/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/tracks",
        json!({ "title": " ", "audioUrl": "ipfs://x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["field"], "title");
}

#[tokio::test]
async fn upvote_toggle_is_symmetric() {
    let app = common::build_test_app();
    register(&app, "alice_01", "0xABC").await;
    let id = create_track(&app, "one").await["id"].as_i64().unwrap();
    let uri = format!("/api/tracks/{id}/upvote");

    let first = body_json(post_json(&app, &uri, json!({ "walletAddress": "0xABC" })).await).await;
    assert_eq!(first["active"], true);
    assert_eq!(first["upvotes"], 1);
    assert_eq!(first["kind"], "upvote");

    let second = body_json(post_json(&app, &uri, json!({ "walletAddress": "0xABC" })).await).await;
    assert_eq!(second["active"], false);
    assert_eq!(second["upvotes"], 0);
}

#[tokio::test]
async fn upvotes_from_different_users_accumulate() {
    let app = common::build_test_app();
    register(&app, "alice_01", "0xA").await;
    register(&app, "bob", "0xB").await;
    let id = create_track(&app, "one").await["id"].as_i64().unwrap();
    let uri = format!("/api/tracks/{id}/upvote");

    post_json(&app, &uri, json!({ "walletAddress": "0xA" })).await;
    let outcome = body_json(post_json(&app, &uri, json!({ "walletAddress": "0xB" })).await).await;
    assert_eq!(outcome["upvotes"], 2);
}

#[tokio::test]
async fn second_gem_conflicts_and_count_stays() {
    let app = common::build_test_app();
    register(&app, "alice_01", "0xABC").await;
    let id = create_track(&app, "one").await["id"].as_i64().unwrap();
    let uri = format!("/api/tracks/{id}/gem");

    let response = post_json(&app, &uri, json!({ "walletAddress": "0xABC" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["gems"], 1);
    assert_eq!(outcome["gemsRemaining"], 15);

    let response = post_json(&app, &uri, json!({ "walletAddress": "0xABC" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let track = body_json(get(&app, &format!("/api/tracks/{id}")).await).await;
    assert_eq!(track["gems"], 1);
}

#[tokio::test]
async fn gem_allowance_is_enforced() {
    let mut config = ApiConfig::default();
    config.interactions.gem_allowance = 1;
    let app = common::build_test_app_with(config);
    register(&app, "alice_01", "0xABC").await;
    let first = create_track(&app, "one").await["id"].as_i64().unwrap();
    let second = create_track(&app, "two").await["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/tracks/{first}/gem"),
        json!({ "walletAddress": "0xABC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        &app,
        &format!("/api/tracks/{second}/gem"),
        json!({ "walletAddress": "0xABC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No gems remaining");
}

#[tokio::test]
async fn interactions_require_registered_wallet() {
    let app = common::build_test_app();
    let id = create_track(&app, "one").await["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/tracks/{id}/gem"),
        json!({ "walletAddress": "0xNOBODY" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn interactions_on_unknown_track_are_404() {
    let app = common::build_test_app();
    register(&app, "alice_01", "0xABC").await;
    let response = post_json(
        &app,
        "/api/tracks/77/upvote",
        json!({ "walletAddress": "0xABC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Track not found");
}

#[tokio::test]
async fn malformed_track_id_is_a_json_bad_request() {
    let app = common::build_test_app();
    let response = get(&app, "/api/tracks/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid input data");
    assert_eq!(body["errors"][0]["field"], "trackId");

    register(&app, "alice_01", "0xABC").await;
    let response = post_json(
        &app,
        "/api/tracks/abc/gem",
        json!({ "walletAddress": "0xABC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["field"], "trackId");
}

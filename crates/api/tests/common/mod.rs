//! Shared helpers for HTTP-level integration tests.
//!
//! Requests are driven straight through the router with
//! `tower::ServiceExt::oneshot`, no TCP listener involved, against the
//! same middleware stack production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use encore_api::auth::jwt::JwtConfig;
use encore_api::config::ServerConfig;
use encore_api::pack_cache::PackCache;
use encore_api::router::build_app_router;
use encore_api::state::AppState;

/// Build a test `ServerConfig` with a fixed JWT secret and safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over the given pool, sharing one pack
/// cache across rebuilds within a test.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_packs(pool, Arc::new(PackCache::new()))
}

pub fn build_test_app_with_packs(pool: PgPool, packs: Arc<PackCache>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        packs,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, path: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    post_json_auth(app, path, token, serde_json::json!({})).await
}

pub async fn put_json_auth(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(path)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a fresh player and return `(access_token, profile_id)`.
pub async fn register_player(pool: &PgPool, email: &str) -> (String, i64) {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": email,
            "display_name": "Test Player",
            "password": "hunter2x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();
    let profile_id = json["data"]["player"]["id"].as_i64().unwrap();
    (token, profile_id)
}

/// Give a profile exact balances, bypassing the API.
pub async fn set_balances(pool: &PgPool, profile_id: i64, money: i64, fans: i64, reputation: i64) {
    sqlx::query(
        "UPDATE player_profiles SET money = $2, fans = $3, reputation = $4 WHERE id = $1",
    )
    .bind(profile_id)
    .bind(money)
    .bind(fans)
    .bind(reputation)
    .execute(pool)
    .await
    .unwrap();
}

/// Current money balance straight from the database.
pub async fn money_of(pool: &PgPool, profile_id: i64) -> i64 {
    let (money,): (i64,) = sqlx::query_as("SELECT money FROM player_profiles WHERE id = $1")
        .bind(profile_id)
        .fetch_one(pool)
        .await
        .unwrap();
    money
}

/// Scout one idol through the API and return its id.
pub async fn scout_idol(pool: &PgPool, token: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/idols/scout", token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["idol"]["id"].as_i64().unwrap()
}

/// Debut a group with freshly scouted members and return its id.
pub async fn debut_group(pool: &PgPool, token: &str, members: usize) -> i64 {
    let mut member_ids = Vec::new();
    for _ in 0..members {
        member_ids.push(scout_idol(pool, token).await);
    }

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/groups",
        token,
        serde_json::json!({
            "name": "Test Group",
            "concept": "fresh",
            "member_ids": member_ids,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["group"]["id"].as_i64().unwrap()
}

/// Produce a song for a group and return its id.
pub async fn produce_song(pool: &PgPool, token: &str, group_id: i64) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/songs",
        token,
        serde_json::json!({ "group_id": group_id, "genre": "pop" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["song"]["id"].as_i64().unwrap()
}

/// Force a song's production timer into the past so it reads as completed.
pub async fn finish_song_production(pool: &PgPool, song_id: i64) {
    sqlx::query("UPDATE songs SET production_ends_at = now() - interval '1 minute' WHERE id = $1")
        .bind(song_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Force a promotion's end time into the past so it is ready to complete.
pub async fn finish_promotion(pool: &PgPool, promotion_id: i64) {
    sqlx::query("UPDATE promotions SET ends_at = now() - interval '1 minute' WHERE id = $1")
        .bind(promotion_id)
        .execute(pool)
        .await
        .unwrap();
}

//! HTTP-level tests for the promotion life cycle: commit, wait, claim.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, debut_group, finish_promotion, finish_song_production, get,
    money_of, post_auth, post_json_auth, produce_song, register_player,
};
use sqlx::PgPool;

/// Register, debut, produce, and finish a song; returns (token, profile,
/// group, song).
async fn stage_ready_song(pool: &PgPool, email: &str) -> (String, i64, i64, i64) {
    let (token, profile_id) = register_player(pool, email).await;
    let group_id = debut_group(pool, &token, 2).await;
    let song_id = produce_song(pool, &token, group_id).await;
    finish_song_production(pool, song_id).await;
    (token, profile_id, group_id, song_id)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn catalog_lists_all_campaign_kinds(pool: PgPool) {
    let (token, _) = register_player(&pool, "catalog@agency.test").await;

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/promotions/available", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let kinds: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        ["social_post", "press_interview", "tv_appearance", "showcase", "fansign"]
    );
    // Odds stay hidden from the client.
    assert!(json["data"][0].get("viral_chance").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn start_freezes_rewards_and_debits_cost(pool: PgPool) {
    let (token, profile_id, group_id, song_id) =
        stage_ready_song(&pool, "promo@agency.test").await;
    let before = money_of(&pool, profile_id).await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/promotions",
        &token,
        serde_json::json!({ "group_id": group_id, "song_id": song_id, "kind": "social_post" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let promo = &json["data"]["promotion"];
    assert_eq!(promo["is_active"], true);
    assert_eq!(promo["is_completed"], false);
    // Rewards are already on the row, waiting to be claimed.
    assert!(promo["fan_reward"].as_i64().unwrap() > 0);
    assert!(promo["money_reward"].as_i64().unwrap() > 0);

    assert_eq!(money_of(&pool, profile_id).await, before - 500);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn start_rejects_a_song_still_in_production(pool: PgPool) {
    let (token, _) = register_player(&pool, "early@agency.test").await;
    let group_id = debut_group(&pool, &token, 2).await;
    let song_id = produce_song(&pool, &token, group_id).await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/promotions",
        &token,
        serde_json::json!({ "group_id": group_id, "song_id": song_id, "kind": "social_post" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_READY");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn start_rejects_a_song_from_another_group(pool: PgPool) {
    let (token, _, group_id, song_id) = stage_ready_song(&pool, "mismatch@agency.test").await;

    // A second group with no songs.
    let other_group = debut_group(&pool, &token, 2).await;
    let _ = group_id;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/promotions",
        &token,
        serde_json::json!({ "group_id": other_group, "song_id": song_id, "kind": "social_post" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONSTRAINT_VIOLATION");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn complete_is_gated_until_the_timer_elapses(pool: PgPool) {
    let (token, _, group_id, song_id) = stage_ready_song(&pool, "gated@agency.test").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/promotions",
        &token,
        serde_json::json!({ "group_id": group_id, "song_id": song_id, "kind": "social_post" }),
    )
    .await;
    let promo_id = body_json(response).await["data"]["promotion"]["id"].as_i64().unwrap();

    // Still running: claiming is premature.
    let app = build_test_app(pool);
    let response = post_auth(app, &format!("/api/v1/promotions/{promo_id}/complete"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_READY");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn complete_pays_out_exactly_once(pool: PgPool) {
    let (token, profile_id, group_id, song_id) =
        stage_ready_song(&pool, "claim@agency.test").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/promotions",
        &token,
        serde_json::json!({ "group_id": group_id, "song_id": song_id, "kind": "social_post" }),
    )
    .await;
    let json = body_json(response).await;
    let promo = &json["data"]["promotion"];
    let promo_id = promo["id"].as_i64().unwrap();
    let fan_reward = promo["fan_reward"].as_i64().unwrap();
    let money_reward = promo["money_reward"].as_i64().unwrap();

    finish_promotion(&pool, promo_id).await;
    let money_before = money_of(&pool, profile_id).await;

    // First claim: the frozen rewards land.
    let app = build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/promotions/{promo_id}/complete"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["rewards"]["fans"], fan_reward);
    assert_eq!(json["data"]["rewards"]["money"], money_reward);
    assert_eq!(money_of(&pool, profile_id).await, money_before + money_reward);

    // Group popularity grew by 10% of the fan reward.
    let (popularity,): (i64,) = sqlx::query_as("SELECT popularity FROM groups WHERE id = $1")
        .bind(group_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(popularity, fan_reward / 10);

    // Second claim: rejected, ledger untouched.
    let app = build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/promotions/{promo_id}/complete"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_COMPLETED");
    assert_eq!(money_of(&pool, profile_id).await, money_before + money_reward);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completing_a_foreign_promotion_is_forbidden(pool: PgPool) {
    let (token, _, group_id, song_id) = stage_ready_song(&pool, "mine@agency.test").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/promotions",
        &token,
        serde_json::json!({ "group_id": group_id, "song_id": song_id, "kind": "social_post" }),
    )
    .await;
    let promo_id = body_json(response).await["data"]["promotion"]["id"].as_i64().unwrap();
    finish_promotion(&pool, promo_id).await;

    let (intruder, _) = register_player(&pool, "yours@agency.test").await;
    let app = build_test_app(pool);
    let response =
        post_auth(app, &format!("/api/v1/promotions/{promo_id}/complete"), &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

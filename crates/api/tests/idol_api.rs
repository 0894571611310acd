//! HTTP-level tests for scouting, training, and releasing idols.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, money_of, post_auth, post_json_auth, register_player,
    scout_idol, set_balances,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn scout_debits_cost_and_creates_one_idol_in_range(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "scout@agency.test").await;

    let app = build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/idols/scout", &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let idol = &json["data"]["idol"];

    // 50 000 - 1 000 scouting fee.
    assert_eq!(json["data"]["player"]["money"], 49_000);
    assert_eq!(money_of(&pool, profile_id).await, 49_000);

    // Exactly one idol row, stats within the rolled rarity's band.
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM idols WHERE player_profile_id = $1")
        .bind(profile_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let (min, max) = match idol["rarity"].as_str().unwrap() {
        "common" => (20, 45),
        "uncommon" => (35, 60),
        "rare" => (50, 75),
        "epic" => (65, 88),
        "legendary" => (80, 100),
        other => panic!("unknown rarity {other}"),
    };
    for stat in ["vocal", "dance", "visual", "charm", "stamina"] {
        let value = idol[stat].as_i64().unwrap();
        assert!(value >= min && value <= max, "{stat}={value} outside [{min},{max}]");
    }

    // Scouting grants 10 experience.
    assert_eq!(json["data"]["player"]["experience"], 10);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scout_with_empty_wallet_fails_and_changes_nothing(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "broke@agency.test").await;
    set_balances(&pool, profile_id, 500, 0, 0).await;

    let app = build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/idols/scout", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_FUNDS");

    // Balance untouched, no idol created.
    assert_eq!(money_of(&pool, profile_id).await, 500);
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM idols WHERE player_profile_id = $1")
        .bind(profile_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn train_applies_gain_immediately_and_blocks_retraining(pool: PgPool) {
    let (token, _) = register_player(&pool, "coach@agency.test").await;
    let idol_id = scout_idol(&pool, &token).await;

    let (before,): (i16,) = sqlx::query_as("SELECT vocal FROM idols WHERE id = $1")
        .bind(idol_id)
        .fetch_one(&pool)
        .await
        .unwrap();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/idols/{idol_id}/train"),
        &token,
        serde_json::json!({ "stat": "vocal" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let gain = json["data"]["increase_amount"].as_i64().unwrap();
    assert!((1..=5).contains(&gain));

    let after = json["data"]["idol"]["vocal"].as_i64().unwrap();
    assert_eq!(after, (i64::from(before) + gain).min(100));

    // The timer is running; a second session is rejected.
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/idols/{idol_id}/train"),
        &token,
        serde_json::json!({ "stat": "dance" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_TRAINING");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_never_exceed_the_cap(pool: PgPool) {
    let (token, _) = register_player(&pool, "cap@agency.test").await;
    let idol_id = scout_idol(&pool, &token).await;

    // Park the stat at 99 so any roll would overflow without the clamp.
    sqlx::query("UPDATE idols SET charm = 99 WHERE id = $1")
        .bind(idol_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/idols/{idol_id}/train"),
        &token,
        serde_json::json!({ "stat": "charm" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["idol"]["charm"], 100);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn training_someone_elses_idol_is_forbidden(pool: PgPool) {
    let (owner_token, _) = register_player(&pool, "owner@agency.test").await;
    let idol_id = scout_idol(&pool, &owner_token).await;

    let (intruder_token, _) = register_player(&pool, "intruder@agency.test").await;
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/idols/{idol_id}/train"),
        &intruder_token,
        serde_json::json!({ "stat": "vocal" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_OWNER");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn release_refuses_grouped_idols(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "release@agency.test").await;
    let group_id = common::debut_group(&pool, &token, 2).await;

    let (member_id,): (i64,) =
        sqlx::query_as("SELECT idol_id FROM group_members WHERE group_id = $1 LIMIT 1")
            .bind(group_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let app = build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/idols/{member_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A free idol releases cleanly.
    let free_id = scout_idol(&pool, &token).await;
    let app = build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/idols/{free_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM idols WHERE player_profile_id = $1")
        .bind(profile_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

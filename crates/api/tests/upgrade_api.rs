//! HTTP-level tests for agency upgrade purchases.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json_auth, register_player, set_balances};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn catalog_shows_all_tracks_at_level_zero(pool: PgPool) {
    let (token, _) = register_player(&pool, "tracks@agency.test").await;

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/upgrades", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let upgrades = json["data"]["upgrades"].as_array().unwrap();
    assert_eq!(upgrades.len(), 3);
    for track in upgrades {
        assert_eq!(track["level"], 0);
        assert_eq!(track["current_bonus"], 0.0);
        assert!(track["next_cost"]["fans"].as_i64().unwrap() > 0);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purchase_without_fans_fails_and_spends_nothing(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "poor@agency.test").await;
    // Fresh profiles have 0 fans and 0 reputation.

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/upgrades/purchase",
        &token,
        serde_json::json!({ "kind": "promo_payout" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_FUNDS");

    let (fans, reputation): (i64, i64) =
        sqlx::query_as("SELECT fans, reputation FROM player_profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!((fans, reputation), (0, 0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purchase_advances_the_track_and_follows_the_curve(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "curve@agency.test").await;
    set_balances(&pool, profile_id, 50_000, 10_000, 1_000).await;

    // Level 0 -> 1 costs the base 800 fans / 5 reputation.
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/upgrades/purchase",
        &token,
        serde_json::json!({ "kind": "promo_payout" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let track = json["data"]["upgrades"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["kind"] == "promo_payout")
        .unwrap()
        .clone();
    assert_eq!(track["level"], 1);
    // Next cost scales geometrically: round(800 * 1.6) = 1280.
    assert_eq!(track["next_cost"]["fans"], 1_280);

    assert_eq!(json["data"]["player"]["fans"], 10_000 - 800);
    assert_eq!(json["data"]["player"]["reputation"], 1_000 - 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purchase_at_cap_is_rejected(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "maxed@agency.test").await;
    set_balances(&pool, profile_id, 50_000, 10_000_000, 1_000_000).await;

    // Park the track at its cap directly.
    sqlx::query(
        "INSERT INTO agency_upgrades (player_profile_id, kind, level) VALUES ($1, 'virality', 10)",
    )
    .bind(profile_id)
    .execute(&pool)
    .await
    .unwrap();

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/upgrades/purchase",
        &token,
        serde_json::json!({ "kind": "virality" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MAX_LEVEL");
}

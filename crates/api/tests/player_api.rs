//! HTTP-level tests for the player overview, managers, and idle events.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, debut_group, get, post_auth, post_json_auth, put_json_auth,
    register_player, scout_idol,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn overview_bundles_everything_the_ledger_owns(pool: PgPool) {
    let (token, _) = register_player(&pool, "overview@agency.test").await;
    let group_id = debut_group(&pool, &token, 2).await;
    common::produce_song(&pool, &token, group_id).await;

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/player", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["idols"].as_array().unwrap().len(), 2);
    assert_eq!(data["groups"].as_array().unwrap().len(), 1);
    assert_eq!(data["songs"].as_array().unwrap().len(), 1);
    assert!(data["manager"].is_null());
    // Group aggregates ride along, freshly recomputed.
    assert!(data["groups"][0]["average_star_power"].as_f64().unwrap() > 0.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn agency_rename_sticks(pool: PgPool) {
    let (token, _) = register_player(&pool, "rename@agency.test").await;

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/player",
        &token,
        serde_json::json!({ "agency_name": "Second Wind" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/me", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["player"]["agency_name"], "Second Wind");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn manager_catalog_is_seeded_and_selectable(pool: PgPool) {
    let (token, _) = register_player(&pool, "hire@agency.test").await;

    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/managers", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let managers = json["data"].as_array().unwrap();
    assert_eq!(managers.len(), 4);
    let first_id = managers[0]["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/managers/select",
        &token,
        serde_json::json!({ "manager_id": first_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/me", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["manager"]["id"], first_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn selecting_an_unknown_manager_is_a_404(pool: PgPool) {
    let (token, _) = register_player(&pool, "ghost@agency.test").await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/managers/select",
        &token,
        serde_json::json!({ "manager_id": 999_999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pulse_without_a_roster_rolls_nothing(pool: PgPool) {
    let (token, _) = register_player(&pool, "quiet@agency.test").await;

    let app = build_test_app(pool);
    let response = post_auth(app, "/api/v1/events/pulse", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["events"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["player"]["money"], 50_000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pulse_credits_exactly_what_it_reports(pool: PgPool) {
    let (token, profile_id) = register_player(&pool, "buzz@agency.test").await;
    for _ in 0..6 {
        scout_idol(&pool, &token).await;
    }
    let before = common::money_of(&pool, profile_id).await;

    let app = build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/events/pulse", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let events = json["data"]["events"].as_array().unwrap();
    assert!(events.len() <= 2);

    let reported: i64 = events.iter().map(|e| e["money"].as_i64().unwrap()).sum();
    assert_eq!(common::money_of(&pool, profile_id).await, before + reported);
}

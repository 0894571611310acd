//! Route tree for the `/api/v1` prefix.

pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/logout                          logout (requires auth)
/// /me                                   current account + profile
///
/// /player                               get, update (rename agency)
///
/// /managers                             catalog
/// /managers/select                      select manager (POST)
///
/// /idols                                roster
/// /idols/scout                          scout one idol (POST)
/// /idols/{id}/train                     train a stat (POST)
/// /idols/{id}                           release (DELETE)
///
/// /groups                               list, debut
/// /groups/{id}                          get, update
/// /groups/{id}/members                  add member (POST)
/// /groups/{id}/members/{idol_id}        remove member (DELETE)
///
/// /songs                                list, produce
/// /songs/{id}                           get
///
/// /promotions                           list, start
/// /promotions/available                 campaign catalog
/// /promotions/{id}/complete             claim rewards (POST)
///
/// /upgrades                             catalog with progress
/// /upgrades/purchase                    buy next level (POST)
///
/// /packs                                open a pack (POST)
/// /packs/{id}/choose                    claim one draft (POST)
///
/// /events/pulse                         roll idle events (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
        // Player
        .route(
            "/player",
            get(handlers::player::show).put(handlers::player::update),
        )
        // Managers
        .route("/managers", get(handlers::managers::index))
        .route("/managers/select", post(handlers::managers::select))
        // Idols
        .route("/idols", get(handlers::idols::index))
        .route("/idols/scout", post(handlers::idols::scout))
        .route("/idols/{id}/train", post(handlers::idols::train))
        .route("/idols/{id}", delete(handlers::idols::release))
        // Groups
        .route(
            "/groups",
            get(handlers::groups::index).post(handlers::groups::store),
        )
        .route(
            "/groups/{id}",
            get(handlers::groups::show).put(handlers::groups::update),
        )
        .route("/groups/{id}/members", post(handlers::groups::add_member))
        .route(
            "/groups/{id}/members/{idol_id}",
            delete(handlers::groups::remove_member),
        )
        // Songs
        .route(
            "/songs",
            get(handlers::songs::index).post(handlers::songs::store),
        )
        .route("/songs/{id}", get(handlers::songs::show))
        // Promotions
        .route(
            "/promotions",
            get(handlers::promotions::index).post(handlers::promotions::start),
        )
        .route("/promotions/available", get(handlers::promotions::available))
        .route(
            "/promotions/{id}/complete",
            post(handlers::promotions::complete),
        )
        // Upgrades
        .route("/upgrades", get(handlers::upgrades::index))
        .route("/upgrades/purchase", post(handlers::upgrades::purchase))
        // Packs
        .route("/packs", post(handlers::packs::open))
        .route("/packs/{id}/choose", post(handlers::packs::choose))
        // Events
        .route("/events/pulse", post(handlers::events::pulse))
}

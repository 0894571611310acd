//! HTTP handlers, one module per resource.

pub mod auth;
pub mod events;
pub mod groups;
pub mod idols;
pub mod managers;
pub mod packs;
pub mod player;
pub mod promotions;
pub mod songs;
pub mod upgrades;

use encore_core::error::GameError;
use encore_db::models::player::PlayerProfile;
use encore_db::repositories::PlayerRepo;

use crate::error::{AppError, AppResult};

/// Load the authenticated player's profile.
///
/// A valid token for a deleted account is the only way this can miss.
pub(crate) async fn fetch_profile(
    pool: &encore_db::DbPool,
    profile_id: encore_core::types::DbId,
) -> AppResult<PlayerProfile> {
    PlayerRepo::find_by_id(pool, profile_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "PlayerProfile",
            id: profile_id,
        }))
}

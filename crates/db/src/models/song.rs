//! Song model and DTOs.

use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A song row from the `songs` table.
///
/// `completed_at` is a committed observation: it is stamped the first time
/// the song is read past `production_ends_at`, and status derivation treats
/// an elapsed timer as completed even before the stamp lands.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Song {
    pub id: DbId,
    pub player_profile_id: DbId,
    pub group_id: DbId,
    pub title: String,
    pub genre: String,
    pub quality: i16,
    pub hype: i16,
    pub production_cost: i64,
    pub production_ends_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for starting a production.
pub struct CreateSong {
    pub player_profile_id: DbId,
    pub group_id: DbId,
    pub title: String,
    pub genre: String,
    pub quality: i16,
    pub hype: i16,
    pub production_cost: i64,
    pub production_ends_at: Timestamp,
}

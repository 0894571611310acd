//! Promotion model and DTOs.

use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A promotion row from the `promotions` table.
///
/// Rewards and the viral flag are frozen at start time; completion pays
/// them out and stamps `completed_at` exactly once.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Promotion {
    pub id: DbId,
    pub player_profile_id: DbId,
    pub group_id: DbId,
    pub song_id: DbId,
    pub kind: String,
    pub cost: i64,
    pub fan_reward: i64,
    pub money_reward: i64,
    pub reputation_reward: i64,
    pub went_viral: bool,
    pub started_at: Timestamp,
    pub ends_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for committing to a new campaign.
pub struct CreatePromotion {
    pub player_profile_id: DbId,
    pub group_id: DbId,
    pub song_id: DbId,
    pub kind: String,
    pub cost: i64,
    pub fan_reward: i64,
    pub money_reward: i64,
    pub reputation_reward: i64,
    pub went_viral: bool,
    pub started_at: Timestamp,
    pub ends_at: Timestamp,
}

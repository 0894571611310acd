//! Agency upgrade model.

use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// An agency upgrade row, unique per `(player_profile_id, kind)`.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct AgencyUpgrade {
    pub id: DbId,
    pub player_profile_id: DbId,
    pub kind: String,
    pub level: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

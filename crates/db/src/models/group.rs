//! Group model and DTOs.

use chrono::NaiveDate;
use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A group row from the `groups` table. Member-derived aggregates are never
/// stored here; they are recomputed from the current line-up on read.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Group {
    pub id: DbId,
    pub player_profile_id: DbId,
    pub name: String,
    pub concept: String,
    pub popularity: i64,
    pub debut_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for debuting a new group.
pub struct CreateGroup {
    pub player_profile_id: DbId,
    pub name: String,
    pub concept: String,
    pub debut_date: NaiveDate,
}

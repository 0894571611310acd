//! Player profile (the ledger row).

use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A player profile row -- the account's resource ledger plus leveling
/// state. Balances are mutated only through `PlayerRepo` operations.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct PlayerProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub agency_name: String,
    pub money: i64,
    pub fans: i64,
    pub reputation: i64,
    pub level: i32,
    pub experience: i64,
    pub manager_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a profile at registration time.
pub struct CreateProfile {
    pub user_id: DbId,
    pub agency_name: String,
}

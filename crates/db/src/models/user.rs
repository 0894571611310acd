//! Account model.

use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A user row from the `users` table.
///
/// The password hash never leaves the server; it is skipped on
/// serialization.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new account.
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

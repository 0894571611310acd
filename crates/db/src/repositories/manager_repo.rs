//! Repository for the `managers` catalog.

use encore_core::types::DbId;
use sqlx::PgPool;

use crate::models::manager::Manager;

const COLUMNS: &str = "id, name, bonus_kind, bonus_value, flavor_text, sprite_key, \
                       created_at, updated_at";

pub struct ManagerRepo;

impl ManagerRepo {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Manager>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM managers ORDER BY id");
        sqlx::query_as::<_, Manager>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Manager>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM managers WHERE id = $1");
        sqlx::query_as::<_, Manager>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The manager currently selected by a profile, if any.
    pub async fn find_selected(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Option<Manager>, sqlx::Error> {
        sqlx::query_as::<_, Manager>(
            "SELECT m.id, m.name, m.bonus_kind, m.bonus_value, m.flavor_text, m.sprite_key,
                    m.created_at, m.updated_at
             FROM managers m
             JOIN player_profiles p ON p.manager_id = m.id
             WHERE p.id = $1",
        )
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }
}

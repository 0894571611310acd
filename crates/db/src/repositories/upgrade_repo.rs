//! Repository for the `agency_upgrades` table.

use encore_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::upgrade::AgencyUpgrade;

const COLUMNS: &str = "id, player_profile_id, kind, level, created_at, updated_at";

pub struct UpgradeRepo;

impl UpgradeRepo {
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<AgencyUpgrade>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agency_upgrades WHERE player_profile_id = $1 ORDER BY kind"
        );
        sqlx::query_as::<_, AgencyUpgrade>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// Current level of one upgrade track; absent rows count as level 0.
    pub async fn level_for(
        pool: &PgPool,
        profile_id: DbId,
        kind: &str,
    ) -> Result<i32, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT level FROM agency_upgrades WHERE player_profile_id = $1 AND kind = $2",
        )
        .bind(profile_id)
        .bind(kind)
        .fetch_optional(pool)
        .await?;
        Ok(row.map_or(0, |(level,)| level))
    }

    /// Fetch-or-insert the track row, locking it for the enclosing
    /// transaction so concurrent purchases serialize.
    pub async fn find_or_create(
        conn: &mut PgConnection,
        profile_id: DbId,
        kind: &str,
    ) -> Result<AgencyUpgrade, sqlx::Error> {
        let query = format!(
            "INSERT INTO agency_upgrades (player_profile_id, kind)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_agency_upgrades_profile_kind
             DO UPDATE SET updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgencyUpgrade>(&query)
            .bind(profile_id)
            .bind(kind)
            .fetch_one(conn)
            .await
    }

    /// Advance one level, guarded by the track cap. Returns the updated
    /// row, or `None` when the cap was already reached.
    pub async fn try_increment_level(
        conn: &mut PgConnection,
        id: DbId,
        max_level: i32,
    ) -> Result<Option<AgencyUpgrade>, sqlx::Error> {
        let query = format!(
            "UPDATE agency_upgrades SET level = level + 1, updated_at = now()
             WHERE id = $1 AND level < $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgencyUpgrade>(&query)
            .bind(id)
            .bind(max_level)
            .fetch_optional(conn)
            .await
    }
}

//! Repository for the `idols` table.

use encore_core::idol::StatKind;
use encore_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::idol::{CreateIdol, Idol};

const COLUMNS: &str = "id, player_profile_id, name, rarity, vocal, dance, visual, charm, \
                       stamina, popularity, training_until, sprite_key, created_at, updated_at";

pub struct IdolRepo;

impl IdolRepo {
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Idol>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM idols WHERE player_profile_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Idol>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Idol>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM idols WHERE id = $1");
        sqlx::query_as::<_, Idol>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a rolled draft as an owned idol.
    pub async fn create(conn: &mut PgConnection, input: &CreateIdol) -> Result<Idol, sqlx::Error> {
        let query = format!(
            "INSERT INTO idols (player_profile_id, name, rarity, vocal, dance, visual, charm, stamina, sprite_key)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idol>(&query)
            .bind(input.player_profile_id)
            .bind(&input.name)
            .bind(&input.rarity)
            .bind(input.vocal)
            .bind(input.dance)
            .bind(input.visual)
            .bind(input.charm)
            .bind(input.stamina)
            .bind(&input.sprite_key)
            .fetch_one(conn)
            .await
    }

    /// Start a training timer.
    pub async fn set_training(
        conn: &mut PgConnection,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE idols SET training_until = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Write a single trained stat.
    ///
    /// The column name comes from the closed [`StatKind`] enum, never from
    /// request input.
    pub async fn set_stat(
        conn: &mut PgConnection,
        id: DbId,
        stat: StatKind,
        value: i16,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE idols SET {} = $2, updated_at = now() WHERE id = $1",
            stat.as_str()
        );
        sqlx::query(&query).bind(id).bind(value).execute(conn).await?;
        Ok(())
    }

    /// Delete an idol. Returns `false` when no row matched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM idols WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(idol_id, group_id)` pairs for every grouped idol of a profile.
    pub async fn group_memberships_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT gm.idol_id, gm.group_id
             FROM group_members gm
             JOIN idols i ON i.id = gm.idol_id
             WHERE i.player_profile_id = $1",
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await
    }

    /// The group this idol currently belongs to, if any.
    pub async fn group_id_for(pool: &PgPool, idol_id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT group_id FROM group_members WHERE idol_id = $1")
                .bind(idol_id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }
}

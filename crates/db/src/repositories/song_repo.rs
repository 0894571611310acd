//! Repository for the `songs` table.

use encore_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::song::{CreateSong, Song};

const COLUMNS: &str = "id, player_profile_id, group_id, title, genre, quality, hype, \
                       production_cost, production_ends_at, completed_at, created_at, updated_at";

pub struct SongRepo;

impl SongRepo {
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Song>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM songs WHERE player_profile_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Song>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM songs WHERE id = $1");
        sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(conn: &mut PgConnection, input: &CreateSong) -> Result<Song, sqlx::Error> {
        let query = format!(
            "INSERT INTO songs (player_profile_id, group_id, title, genre, quality, hype, production_cost, production_ends_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(input.player_profile_id)
            .bind(input.group_id)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(input.quality)
            .bind(input.hype)
            .bind(input.production_cost)
            .bind(input.production_ends_at)
            .fetch_one(conn)
            .await
    }

    /// Commit the completion observation for an elapsed production.
    ///
    /// First-observer-wins and harmless to repeat: the stamp lands only
    /// when the timer has elapsed and no stamp exists yet. Returns the
    /// fresh row either way (or `None` for an unknown id).
    pub async fn commit_completion(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Song>, sqlx::Error> {
        sqlx::query(
            "UPDATE songs SET completed_at = now(), updated_at = now()
             WHERE id = $1 AND completed_at IS NULL AND production_ends_at <= now()",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }
}

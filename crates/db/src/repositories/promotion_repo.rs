//! Repository for the `promotions` table.

use encore_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::promotion::{CreatePromotion, Promotion};

const COLUMNS: &str = "id, player_profile_id, group_id, song_id, kind, cost, fan_reward, \
                       money_reward, reputation_reward, went_viral, started_at, ends_at, \
                       completed_at, created_at, updated_at";

pub struct PromotionRepo;

impl PromotionRepo {
    /// All campaigns for a profile, newest first.
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Promotion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM promotions WHERE player_profile_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Promotion>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Promotion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions WHERE id = $1");
        sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Commit to a campaign with its pre-rolled rewards.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreatePromotion,
    ) -> Result<Promotion, sqlx::Error> {
        let query = format!(
            "INSERT INTO promotions (player_profile_id, group_id, song_id, kind, cost,
                                     fan_reward, money_reward, reputation_reward, went_viral,
                                     started_at, ends_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Promotion>(&query)
            .bind(input.player_profile_id)
            .bind(input.group_id)
            .bind(input.song_id)
            .bind(&input.kind)
            .bind(input.cost)
            .bind(input.fan_reward)
            .bind(input.money_reward)
            .bind(input.reputation_reward)
            .bind(input.went_viral)
            .bind(input.started_at)
            .bind(input.ends_at)
            .fetch_one(conn)
            .await
    }

    /// Stamp `completed_at`, but only for an elapsed, unstamped campaign.
    ///
    /// Returns the stamped row, or `None` when the guard did not match --
    /// the caller distinguishes "already completed" from "not ready" by
    /// deriving the status beforehand; losing that race resolves to
    /// already-completed.
    pub async fn try_complete(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Promotion>, sqlx::Error> {
        let query = format!(
            "UPDATE promotions SET completed_at = now(), updated_at = now()
             WHERE id = $1 AND completed_at IS NULL AND ends_at <= now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}

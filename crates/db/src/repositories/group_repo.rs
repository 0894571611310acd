//! Repository for the `groups` and `group_members` tables.

use encore_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::group::{CreateGroup, Group};
use crate::models::idol::Idol;

const COLUMNS: &str = "id, player_profile_id, name, concept, popularity, debut_date, \
                       created_at, updated_at";

pub struct GroupRepo;

impl GroupRepo {
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM groups WHERE player_profile_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a group and lock its row for the enclosing transaction, so
    /// concurrent line-up changes serialize and the member bounds hold.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn create(conn: &mut PgConnection, input: &CreateGroup) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (player_profile_id, name, concept, debut_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(input.player_profile_id)
            .bind(&input.name)
            .bind(&input.concept)
            .bind(input.debut_date)
            .fetch_one(conn)
            .await
    }

    /// Patch name and/or concept.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        concept: Option<&str>,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups
             SET name = COALESCE($2, name), concept = COALESCE($3, concept), updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(name)
            .bind(concept)
            .fetch_optional(pool)
            .await
    }

    /// Current line-up in join order.
    pub async fn members(pool: &PgPool, group_id: DbId) -> Result<Vec<Idol>, sqlx::Error> {
        sqlx::query_as::<_, Idol>(
            "SELECT i.id, i.player_profile_id, i.name, i.rarity, i.vocal, i.dance, i.visual,
                    i.charm, i.stamina, i.popularity, i.training_until, i.sprite_key,
                    i.created_at, i.updated_at
             FROM idols i
             JOIN group_members gm ON gm.idol_id = i.id
             WHERE gm.group_id = $1
             ORDER BY gm.id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    pub async fn member_count(conn: &mut PgConnection, group_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(conn)
                .await?;
        Ok(count)
    }

    pub async fn add_member(
        conn: &mut PgConnection,
        group_id: DbId,
        idol_id: DbId,
        position: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO group_members (group_id, idol_id, position) VALUES ($1, $2, $3)")
            .bind(group_id)
            .bind(idol_id)
            .bind(position)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Remove an idol from the line-up. Returns `false` when the idol was
    /// not a member.
    pub async fn remove_member(
        conn: &mut PgConnection,
        group_id: DbId,
        idol_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND idol_id = $2")
                .bind(group_id)
                .bind(idol_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump popularity after a completed promotion.
    pub async fn increment_popularity(
        conn: &mut PgConnection,
        group_id: DbId,
        amount: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE groups SET popularity = popularity + $2, updated_at = now() WHERE id = $1",
        )
        .bind(group_id)
        .bind(amount)
        .execute(conn)
        .await?;
        Ok(())
    }
}

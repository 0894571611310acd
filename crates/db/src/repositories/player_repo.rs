//! Repository for the `player_profiles` table (the ledger).
//!
//! All balance mutations are expressed as single conditional or
//! incrementing `UPDATE` statements so that concurrent requests against the
//! same profile can never double-spend or lose a credit.

use encore_core::ledger;
use encore_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::player::{CreateProfile, PlayerProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, agency_name, money, fans, reputation, level, \
                       experience, manager_id, created_at, updated_at";

pub struct PlayerRepo;

impl PlayerRepo {
    /// Insert a fresh profile with the starting balances.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateProfile,
    ) -> Result<PlayerProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO player_profiles (user_id, agency_name, money, fans, reputation, level, experience)
             VALUES ($1, $2, $3, $4, $5, 1, 0)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerProfile>(&query)
            .bind(input.user_id)
            .bind(&input.agency_name)
            .bind(ledger::STARTING_MONEY)
            .bind(ledger::STARTING_FANS)
            .bind(ledger::STARTING_REPUTATION)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PlayerProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM player_profiles WHERE id = $1");
        sqlx::query_as::<_, PlayerProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<PlayerProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM player_profiles WHERE user_id = $1");
        sqlx::query_as::<_, PlayerProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Rename the agency. Returns the updated row, or `None` if the profile
    /// does not exist.
    pub async fn rename_agency(
        pool: &PgPool,
        id: DbId,
        agency_name: &str,
    ) -> Result<Option<PlayerProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE player_profiles SET agency_name = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerProfile>(&query)
            .bind(id)
            .bind(agency_name)
            .fetch_optional(pool)
            .await
    }

    /// Select (or switch) the profile's manager.
    pub async fn set_manager(
        pool: &PgPool,
        id: DbId,
        manager_id: DbId,
    ) -> Result<Option<PlayerProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE player_profiles SET manager_id = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerProfile>(&query)
            .bind(id)
            .bind(manager_id)
            .fetch_optional(pool)
            .await
    }

    /// Conditionally spend money. Returns `false` (and changes nothing)
    /// when the balance is short -- the debit and the affordability check
    /// are a single statement.
    pub async fn try_debit_money(
        conn: &mut PgConnection,
        id: DbId,
        amount: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE player_profiles SET money = money - $2, updated_at = now()
             WHERE id = $1 AND money >= $2",
        )
        .bind(id)
        .bind(amount)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Conditionally spend fans and reputation together (upgrade purchases).
    /// Either both balances cover the cost or nothing changes.
    pub async fn try_debit_fans_and_reputation(
        conn: &mut PgConnection,
        id: DbId,
        fans: i64,
        reputation: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE player_profiles
             SET fans = fans - $2, reputation = reputation - $3, updated_at = now()
             WHERE id = $1 AND fans >= $2 AND reputation >= $3",
        )
        .bind(id)
        .bind(fans)
        .bind(reputation)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unconditionally credit any combination of money, fans, and
    /// reputation.
    pub async fn credit(
        conn: &mut PgConnection,
        id: DbId,
        money: i64,
        fans: i64,
        reputation: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE player_profiles
             SET money = money + $2, fans = fans + $3, reputation = reputation + $4,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(money)
        .bind(fans)
        .bind(reputation)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Grant experience and cascade level-ups.
    ///
    /// Locks the row, applies the cascade from `encore_core::ledger`, and
    /// writes back level + leftover experience in one statement, so the
    /// `experience < level * 100` invariant holds even under concurrent
    /// grants.
    pub async fn add_experience(
        conn: &mut PgConnection,
        id: DbId,
        amount: i64,
    ) -> Result<PlayerProfile, sqlx::Error> {
        let (level, experience): (i32, i64) = sqlx::query_as(
            "SELECT level, experience FROM player_profiles WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        let (level, experience) = ledger::apply_experience(level, experience, amount);

        let query = format!(
            "UPDATE player_profiles SET level = $2, experience = $3, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerProfile>(&query)
            .bind(id)
            .bind(level)
            .bind(experience)
            .fetch_one(conn)
            .await
    }
}

//! Ledger arithmetic: balance guards and the experience level-up cascade.
//!
//! The ledger itself (money, fans, reputation, level, experience) lives on
//! the player profile row; this module holds the pure rules the repository
//! applies inside its transactions.

use crate::error::GameError;

// ---------------------------------------------------------------------------
// Starting values
// ---------------------------------------------------------------------------

/// Money a fresh agency starts with.
pub const STARTING_MONEY: i64 = 50_000;
/// Fans a fresh agency starts with.
pub const STARTING_FANS: i64 = 0;
/// Reputation a fresh agency starts with.
pub const STARTING_REPUTATION: i64 = 0;

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

/// Experience required to advance past the given level.
pub fn required_experience(level: i32) -> i64 {
    i64::from(level) * 100
}

/// Apply gained experience and cascade level-ups.
///
/// While the running experience total meets the current level's threshold,
/// the threshold is subtracted and the level incremented, so a single large
/// grant can jump several levels. Afterwards `experience <
/// required_experience(level)` always holds.
pub fn apply_experience(level: i32, experience: i64, gained: i64) -> (i32, i64) {
    let mut level = level;
    let mut experience = experience + gained;
    while experience >= required_experience(level) {
        experience -= required_experience(level);
        level += 1;
    }
    (level, experience)
}

// ---------------------------------------------------------------------------
// Balance guard
// ---------------------------------------------------------------------------

/// Check an intended debit against a balance.
///
/// Returns the new balance, or [`GameError::InsufficientFunds`] leaving the
/// caller's state untouched. The repository re-expresses this same guard as
/// a conditional `UPDATE` so concurrent requests cannot both pass a stale
/// check.
pub fn check_debit(balance: i64, amount: i64, resource: &'static str) -> Result<i64, GameError> {
    if balance < amount {
        return Err(GameError::InsufficientFunds {
            resource,
            required: amount,
        });
    }
    Ok(balance - amount)
}

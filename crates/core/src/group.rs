//! Group membership rules and member-derived aggregates.
//!
//! Aggregates are always recomputed from the current member list; nothing is
//! cached on the group row.

use crate::error::GameError;
use crate::idol::star_power;

// ---------------------------------------------------------------------------
// Bounds & costs
// ---------------------------------------------------------------------------

/// Minimum members a group may ever have.
pub const MIN_MEMBERS: usize = 2;
/// Maximum members a group may ever have.
pub const MAX_MEMBERS: usize = 7;
/// Money cost of debuting a new group.
pub const CREATION_COST: i64 = 10_000;
/// Experience granted for a debut.
pub const DEBUT_XP: i64 = 50;

// ---------------------------------------------------------------------------
// Concept
// ---------------------------------------------------------------------------

/// Group concept tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    Cute,
    GirlCrush,
    Elegant,
    Fresh,
    Powerful,
    Dark,
    Retro,
}

impl Concept {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cute => "cute",
            Self::GirlCrush => "girl_crush",
            Self::Elegant => "elegant",
            Self::Fresh => "fresh",
            Self::Powerful => "powerful",
            Self::Dark => "dark",
            Self::Retro => "retro",
        }
    }
}

// ---------------------------------------------------------------------------
// Membership rules
// ---------------------------------------------------------------------------

/// Validate a debut line-up size.
pub fn validate_debut_size(member_count: usize) -> Result<(), GameError> {
    if !(MIN_MEMBERS..=MAX_MEMBERS).contains(&member_count) {
        return Err(GameError::Constraint(format!(
            "A group needs between {MIN_MEMBERS} and {MAX_MEMBERS} members"
        )));
    }
    Ok(())
}

/// Reject joining a full group.
pub fn check_can_add(member_count: usize) -> Result<(), GameError> {
    if member_count >= MAX_MEMBERS {
        return Err(GameError::Constraint(format!(
            "Group has reached maximum members ({MAX_MEMBERS})"
        )));
    }
    Ok(())
}

/// Reject shrinking a group below the member floor.
pub fn check_can_remove(member_count: usize) -> Result<(), GameError> {
    if member_count <= MIN_MEMBERS {
        return Err(GameError::Constraint(format!(
            "Group must keep at least {MIN_MEMBERS} members"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// The member stats the aggregates are computed over.
#[derive(Debug, Clone, Copy)]
pub struct MemberStats {
    pub vocal: i16,
    pub dance: i16,
    pub visual: i16,
    pub charm: i16,
    pub stamina: i16,
}

impl MemberStats {
    pub fn star_power(&self) -> i32 {
        star_power(self.vocal, self.dance, self.visual, self.charm, self.stamina)
    }
}

/// Sum of member star power.
pub fn total_star_power(members: &[MemberStats]) -> i64 {
    members.iter().map(|m| i64::from(m.star_power())).sum()
}

/// Mean member star power, rounded to two decimals. Empty groups score 0.
pub fn average_star_power(members: &[MemberStats]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    round2(total_star_power(members) as f64 / members.len() as f64)
}

/// Mean of a single stat across members, rounded to two decimals.
pub fn average_stat(members: &[MemberStats], pick: impl Fn(&MemberStats) -> i16) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total: i64 = members.iter().map(|m| i64::from(pick(m))).sum();
    round2(total as f64 / members.len() as f64)
}

/// Song-quality bonus contributed by the group: avg star power / 200,
/// i.e. up to +50% for a hypothetical all-100 line-up.
pub fn song_quality_bonus(average_star_power: f64) -> f64 {
    average_star_power / 200.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

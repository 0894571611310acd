//! Song production: quality rolls, derived status, and promotion power.

use rand::Rng;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Production settings
// ---------------------------------------------------------------------------

/// Money cost of producing a song.
pub const BASE_PRODUCTION_COST: i64 = 8_000;
/// Unmodified production duration.
pub const BASE_PRODUCTION_MINUTES: i64 = 5;
/// Experience granted for starting a production.
pub const PRODUCTION_XP: i64 = 25;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Pop,
    Dance,
    Ballad,
    Hiphop,
    Rnb,
    Edm,
    Rock,
}

impl Genre {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pop => "pop",
            Self::Dance => "dance",
            Self::Ballad => "ballad",
            Self::Hiphop => "hiphop",
            Self::Rnb => "rnb",
            Self::Edm => "edm",
            Self::Rock => "rock",
        }
    }
}

// ---------------------------------------------------------------------------
// Derived status
// ---------------------------------------------------------------------------

/// Production state, derived from the clock rather than stored.
///
/// `Completed` covers both the committed case (`completed_at` stamped) and
/// the observed-but-uncommitted case (`production_ends_at` in the past);
/// persisting the stamp is a separate idempotent step the repository
/// performs on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SongStatus {
    InProduction,
    Completed,
}

pub fn derive_status(
    now: Timestamp,
    production_ends_at: Timestamp,
    completed_at: Option<Timestamp>,
) -> SongStatus {
    if completed_at.is_some() || production_ends_at <= now {
        SongStatus::Completed
    } else {
        SongStatus::InProduction
    }
}

// ---------------------------------------------------------------------------
// Quality & power
// ---------------------------------------------------------------------------

/// Uniform base quality in [40, 80], before the group bonus.
pub fn roll_base_quality(rng: &mut impl Rng) -> i16 {
    rng.random_range(40..=80)
}

/// Uniform hype in [30, 70].
pub fn roll_hype(rng: &mut impl Rng) -> i16 {
    rng.random_range(30..=70)
}

/// Final quality: base scaled by the group bonus, capped at 100.
pub fn final_quality(base: i16, group_bonus: f64) -> i16 {
    ((f64::from(base) * (1.0 + group_bonus)) as i16).min(100)
}

/// Promotion power: quality + hype + half the group's average star power,
/// truncated to an integer.
pub fn promotion_power(quality: i16, hype: i16, group_avg_star_power: f64) -> i32 {
    (f64::from(quality) + f64::from(hype) + group_avg_star_power * 0.5) as i32
}

/// Production duration after the production-speed upgrade, floored at one
/// minute.
pub fn production_duration_mins(speed_bonus: f64) -> i64 {
    ((BASE_PRODUCTION_MINUTES as f64 * (1.0 - speed_bonus)) as i64).max(1)
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

const TITLE_PREFIXES: &[&str] = &[
    "Love", "Star", "Dream", "Fire", "Ice", "Night", "Day", "Moon", "Sun", "Heart",
];
const TITLE_SUFFIXES: &[&str] = &[
    "Story", "Light", "Dance", "Kiss", "Beat", "Fever", "Rush", "Game", "Way", "Time",
];

/// Generate a two-word title when the player didn't supply one.
pub fn generate_title(rng: &mut impl Rng) -> String {
    let prefix = TITLE_PREFIXES[rng.random_range(0..TITLE_PREFIXES.len())];
    let suffix = TITLE_SUFFIXES[rng.random_range(0..TITLE_SUFFIXES.len())];
    format!("{prefix} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn status_in_production_until_end_time() {
        let now = Utc::now();
        let ends = now + Duration::minutes(3);
        assert_eq!(derive_status(now, ends, None), SongStatus::InProduction);
    }

    #[test]
    fn status_completed_once_end_time_passes_even_without_stamp() {
        let now = Utc::now();
        let ends = now - Duration::seconds(1);
        assert_eq!(derive_status(now, ends, None), SongStatus::Completed);
    }

    #[test]
    fn committed_stamp_wins_regardless_of_end_time() {
        let now = Utc::now();
        let ends = now + Duration::minutes(3);
        assert_eq!(
            derive_status(now, ends, Some(now)),
            SongStatus::Completed
        );
    }

    #[test]
    fn quality_rolls_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let q = roll_base_quality(&mut rng);
            assert!((40..=80).contains(&q));
            let h = roll_hype(&mut rng);
            assert!((30..=70).contains(&h));
        }
    }

    #[test]
    fn final_quality_applies_group_bonus_and_cap() {
        // 60 * 1.25 = 75
        assert_eq!(final_quality(60, 0.25), 75);
        // 80 * 1.5 = 120 -> capped.
        assert_eq!(final_quality(80, 0.5), 100);
        assert_eq!(final_quality(40, 0.0), 40);
    }

    #[test]
    fn promotion_power_worked_example() {
        // quality 70 + hype 50 + 0.5 * 40 = 140.
        assert_eq!(promotion_power(70, 50, 40.0), 140);
        // Truncation: 60 + 30 + 0.5 * 33 = 106.5 -> 106.
        assert_eq!(promotion_power(60, 30, 33.0), 106);
    }

    #[test]
    fn production_duration_floor() {
        assert_eq!(production_duration_mins(0.0), 5);
        // 5 * (1 - 0.25) = 3.75 -> 3.
        assert_eq!(production_duration_mins(0.25), 3);
        assert_eq!(production_duration_mins(0.95), 1);
    }

    #[test]
    fn generated_titles_come_from_the_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        let title = generate_title(&mut rng);
        let (prefix, suffix) = title.split_once(' ').unwrap();
        assert!(TITLE_PREFIXES.contains(&prefix));
        assert!(TITLE_SUFFIXES.contains(&suffix));
    }
}

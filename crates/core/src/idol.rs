//! Idol generation, star power, and training rolls.

use rand::Rng;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Costs & rewards
// ---------------------------------------------------------------------------

/// Money cost of a single scouting trip.
pub const SCOUT_COST: i64 = 1_000;
/// Money cost of a five-draft idol pack.
pub const PACK_COST: i64 = 2_500;
/// Drafts offered per pack.
pub const PACK_SIZE: usize = 5;
/// Experience granted for recruiting an idol (scout or pack claim).
pub const SCOUT_XP: i64 = 10;

/// Money cost of one training session.
pub const TRAINING_COST: i64 = 1_000;
/// Unmodified training duration.
pub const TRAINING_MINUTES: i64 = 2;

/// Upper bound for every stat.
pub const STAT_CAP: i16 = 100;

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Rarity tier of a generated idol. Each tier maps to a stat range; the
/// weighted roll makes higher tiers progressively scarcer (50/30/14/5/1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Inclusive (min, max) stat range for this tier before quality bonuses.
    pub fn stat_range(self) -> (i16, i16) {
        match self {
            Self::Common => (20, 45),
            Self::Uncommon => (35, 60),
            Self::Rare => (50, 75),
            Self::Epic => (65, 88),
            Self::Legendary => (80, 100),
        }
    }

    /// Weighted rarity roll: 50% common, 30% uncommon, 14% rare, 5% epic,
    /// 1% legendary.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let roll = rng.random_range(1..=100);
        match roll {
            1..=50 => Self::Common,
            51..=80 => Self::Uncommon,
            81..=94 => Self::Rare,
            95..=99 => Self::Epic,
            _ => Self::Legendary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

// ---------------------------------------------------------------------------
// Stat kinds
// ---------------------------------------------------------------------------

/// The five trainable stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Vocal,
    Dance,
    Visual,
    Charm,
    Stamina,
}

impl StatKind {
    /// Column / field name, used by the repository layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vocal => "vocal",
            Self::Dance => "dance",
            Self::Visual => "visual",
            Self::Charm => "charm",
            Self::Stamina => "stamina",
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// A generated idol that has not been persisted yet (scout result or pack
/// draft).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IdolDraft {
    pub name: String,
    pub rarity: Rarity,
    pub vocal: i16,
    pub dance: i16,
    pub visual: i16,
    pub charm: i16,
    pub stamina: i16,
    pub sprite_key: String,
}

/// Name pool for generated idols.
const NAMES: &[&str] = &[
    "Minho", "Taehyun", "Woojin", "Hyunjin", "Seungmin", "Changbin", "Bangchan", "Heeseung",
    "Jake", "Jay", "Sunghoon", "Jungwon", "Sunoo", "Ni-ki", "Yeonjun", "Soobin", "Beomgyu",
    "Huening Kai", "Felix", "Yechan", "Jisung", "Jongho", "San", "Yeosang", "Wooyoung", "Mingi",
    "Hongjoong", "Yunho", "Seonghwa", "Jinyoung", "Mark", "Jaehyun", "Taeyong", "Doyoung", "Ten",
    "Renjun", "Jeno", "Haechan", "Jaemin", "Chenle", "Shotaro", "Sungchan", "Lucas", "Kihyun",
    "Changkyun", "Shownu", "Minhyuk", "Hyungwon", "Hyuk", "Ravi", "Leo", "Ken", "Hongseok",
    "Shinwon", "Yuto", "Yanan", "Hui", "Kino", "Wooseok", "Jungwoo", "Taemin", "Jongin",
];

/// Number of idol sprite variants shipped with the frontend.
const SPRITE_COUNT: u32 = 12;

/// Generate a random idol draft.
///
/// Rarity is rolled first, then each of the five stats is drawn uniformly
/// from the tier's range. A scouting-quality bonus stretches the upper bound
/// by `tier_max * (1 + quality_bonus)`, capped at [`STAT_CAP`].
pub fn generate_draft(rng: &mut impl Rng, quality_bonus: f64) -> IdolDraft {
    let rarity = Rarity::roll(rng);
    generate_draft_with_rarity(rng, rarity, quality_bonus)
}

/// Generate a draft with a fixed rarity (used by tests and seeded content).
pub fn generate_draft_with_rarity(
    rng: &mut impl Rng,
    rarity: Rarity,
    quality_bonus: f64,
) -> IdolDraft {
    let (min, raw_max) = rarity.stat_range();
    let max = (f64::from(raw_max) * (1.0 + quality_bonus)) as i16;
    let max = max.min(STAT_CAP);

    let mut stat = || rng.random_range(min..=max);
    let (vocal, dance, visual, charm, stamina) = (stat(), stat(), stat(), stat(), stat());

    IdolDraft {
        name: NAMES[rng.random_range(0..NAMES.len())].to_string(),
        rarity,
        vocal,
        dance,
        visual,
        charm,
        stamina,
        sprite_key: format!("idol_{}", rng.random_range(1..=SPRITE_COUNT)),
    }
}

// ---------------------------------------------------------------------------
// Star power
// ---------------------------------------------------------------------------

/// Weighted composite of the five stats, truncated to an integer.
///
/// Weights: vocal 0.25, dance 0.25, visual 0.20, charm 0.20, stamina 0.10.
pub fn star_power(vocal: i16, dance: i16, visual: i16, charm: i16, stamina: i16) -> i32 {
    (f64::from(vocal) * 0.25
        + f64::from(dance) * 0.25
        + f64::from(visual) * 0.20
        + f64::from(charm) * 0.20
        + f64::from(stamina) * 0.10) as i32
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// Uniform training gain in [1, 5].
pub fn roll_training_gain(rng: &mut impl Rng) -> i16 {
    rng.random_range(1..=5)
}

/// Apply a training gain to a stat, clamped at [`STAT_CAP`].
pub fn apply_training(current: i16, gain: i16) -> i16 {
    (current + gain).min(STAT_CAP)
}

/// Training duration after a trainer's speed bonus, floored at one minute.
pub fn training_duration_mins(speed_bonus: f64) -> i64 {
    ((TRAINING_MINUTES as f64 * (1.0 - speed_bonus)) as i64).max(1)
}

/// Whether the idol is still blocked by a training timer.
pub fn is_training(training_until: Option<Timestamp>, now: Timestamp) -> bool {
    training_until.is_some_and(|until| until > now)
}

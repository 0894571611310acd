//! Manager bonuses.
//!
//! Managers are global catalog rows (seeded with the schema); a profile
//! selects at most one, and the selection contributes its bonus only to
//! actions of its own kind.

// ---------------------------------------------------------------------------
// Bonus kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    PromotionBoost,
    TrainingSpeed,
    ViralityChance,
    AwardChance,
    ScoutingQuality,
}

impl BonusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PromotionBoost => "promotion_boost",
            Self::TrainingSpeed => "training_speed",
            Self::ViralityChance => "virality_chance",
            Self::AwardChance => "award_chance",
            Self::ScoutingQuality => "scouting_quality",
        }
    }

    /// Parse a stored bonus-kind tag. Unknown tags read as `None` so a
    /// mistyped catalog row degrades to "no bonus" instead of failing.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "promotion_boost" => Some(Self::PromotionBoost),
            "training_speed" => Some(Self::TrainingSpeed),
            "virality_chance" => Some(Self::ViralityChance),
            "award_chance" => Some(Self::AwardChance),
            "scouting_quality" => Some(Self::ScoutingQuality),
            _ => None,
        }
    }
}

/// Resolve a selected manager's contribution to an action.
///
/// `selected` is the (kind, value) of the profile's manager, if any; the
/// bonus applies only when the kinds match.
pub fn manager_bonus(selected: Option<(BonusKind, f64)>, wanted: BonusKind) -> f64 {
    match selected {
        Some((kind, value)) if kind == wanted => value,
        _ => 0.0,
    }
}

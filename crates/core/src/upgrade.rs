//! Agency upgrades: geometric cost curve and per-level bonuses.
//!
//! Upgrades are paid in fans and reputation rather than money, making them
//! the long-term sink for promotion rewards.

use crate::error::GameError;

// ---------------------------------------------------------------------------
// Kinds & config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    PromoPayout,
    Virality,
    ProductionSpeed,
}

/// Static tuning values for one upgrade track.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct UpgradeConfig {
    pub label: &'static str,
    pub description: &'static str,
    pub base_cost_fans: i64,
    pub base_cost_reputation: i64,
    pub scaling: f64,
    pub bonus_per_level: f64,
    pub max_level: i32,
}

impl UpgradeKind {
    pub const ALL: [Self; 3] = [Self::PromoPayout, Self::Virality, Self::ProductionSpeed];

    pub fn config(self) -> UpgradeConfig {
        match self {
            Self::PromoPayout => UpgradeConfig {
                label: "Promotion Payout",
                description: "Increase fans, money, and reputation earned from promotions.",
                base_cost_fans: 800,
                base_cost_reputation: 5,
                scaling: 1.6,
                bonus_per_level: 0.05,
                max_level: 10,
            },
            Self::Virality => UpgradeConfig {
                label: "Virality Chance",
                description: "Boost chance for promotions to go viral.",
                base_cost_fans: 1_200,
                base_cost_reputation: 12,
                scaling: 1.55,
                bonus_per_level: 0.01,
                max_level: 10,
            },
            Self::ProductionSpeed => UpgradeConfig {
                label: "Production Speed",
                description: "Reduce song production time.",
                base_cost_fans: 1_000,
                base_cost_reputation: 8,
                scaling: 1.5,
                bonus_per_level: 0.05,
                max_level: 8,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PromoPayout => "promo_payout",
            Self::Virality => "virality",
            Self::ProductionSpeed => "production_speed",
        }
    }
}

// ---------------------------------------------------------------------------
// Cost curve & bonuses
// ---------------------------------------------------------------------------

/// Price of advancing from `level` to `level + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct UpgradeCost {
    pub fans: i64,
    pub reputation: i64,
}

/// Geometric cost curve: `round(base * scaling^level)` for both resources.
pub fn cost_for_next_level(kind: UpgradeKind, level: i32) -> UpgradeCost {
    let config = kind.config();
    let multiplier = config.scaling.powi(level);
    UpgradeCost {
        fans: (config.base_cost_fans as f64 * multiplier).round() as i64,
        reputation: (config.base_cost_reputation as f64 * multiplier).round() as i64,
    }
}

/// Bonus granted at a level: `level * bonus_per_level`, uncapped below
/// max_level.
pub fn bonus_at_level(kind: UpgradeKind, level: i32) -> f64 {
    f64::from(level) * kind.config().bonus_per_level
}

/// Reject purchases past the track's cap.
pub fn check_below_cap(kind: UpgradeKind, level: i32) -> Result<(), GameError> {
    if level >= kind.config().max_level {
        return Err(GameError::AlreadyAtMax);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog progress
// ---------------------------------------------------------------------------

/// One catalog row: the static config joined with a profile's progress.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UpgradeProgress {
    pub kind: UpgradeKind,
    pub label: &'static str,
    pub description: &'static str,
    pub level: i32,
    pub max_level: i32,
    pub bonus_per_level: f64,
    pub current_bonus: f64,
    /// `None` once the track is maxed out.
    pub next_cost: Option<UpgradeCost>,
}

pub fn progress(kind: UpgradeKind, level: i32) -> UpgradeProgress {
    let config = kind.config();
    let next_cost = if level >= config.max_level {
        None
    } else {
        Some(cost_for_next_level(kind, level))
    };
    UpgradeProgress {
        kind,
        label: config.label,
        description: config.description,
        level,
        max_level: config.max_level,
        bonus_per_level: config.bonus_per_level,
        current_bonus: bonus_at_level(kind, level),
        next_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn cost_curve_worked_example() {
        // 800 * 1.6^2 = 2048 fans at level 2.
        let cost = cost_for_next_level(UpgradeKind::PromoPayout, 2);
        assert_eq!(cost.fans, 2_048);
        // 5 * 1.6^2 = 12.8 -> rounds to 13.
        assert_eq!(cost.reputation, 13);
    }

    #[test]
    fn level_zero_costs_the_base() {
        let cost = cost_for_next_level(UpgradeKind::Virality, 0);
        assert_eq!(cost.fans, 1_200);
        assert_eq!(cost.reputation, 12);
    }

    #[test]
    fn cost_grows_monotonically() {
        for kind in UpgradeKind::ALL {
            let mut prev = 0;
            for level in 0..kind.config().max_level {
                let cost = cost_for_next_level(kind, level);
                assert!(cost.fans > prev);
                prev = cost.fans;
            }
        }
    }

    #[test]
    fn bonus_scales_linearly_with_level() {
        assert_eq!(bonus_at_level(UpgradeKind::PromoPayout, 0), 0.0);
        assert!((bonus_at_level(UpgradeKind::PromoPayout, 3) - 0.15).abs() < 1e-9);
        assert!((bonus_at_level(UpgradeKind::Virality, 10) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn cap_check_rejects_maxed_track() {
        assert!(check_below_cap(UpgradeKind::ProductionSpeed, 7).is_ok());
        assert_matches!(
            check_below_cap(UpgradeKind::ProductionSpeed, 8),
            Err(GameError::AlreadyAtMax)
        );
    }

    #[test]
    fn progress_hides_cost_at_cap() {
        let maxed = progress(UpgradeKind::Virality, 10);
        assert!(maxed.next_cost.is_none());
        assert!((maxed.current_bonus - 0.1).abs() < 1e-9);

        let open = progress(UpgradeKind::Virality, 4);
        assert!(open.next_cost.is_some());
        assert_eq!(open.level, 4);
    }
}

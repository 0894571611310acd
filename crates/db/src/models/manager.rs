//! Manager catalog model.

use encore_core::manager::{manager_bonus, BonusKind};
use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A manager row from the global catalog.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Manager {
    pub id: DbId,
    pub name: String,
    pub bonus_kind: String,
    pub bonus_value: f64,
    pub flavor_text: String,
    pub sprite_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Manager {
    /// The manager's contribution to an action of the given kind.
    pub fn bonus_for(&self, wanted: BonusKind) -> f64 {
        let selected = BonusKind::parse(&self.bonus_kind).map(|kind| (kind, self.bonus_value));
        manager_bonus(selected, wanted)
    }
}

//! Idol model and DTOs.

use encore_core::idol::{star_power, IdolDraft};
use encore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// An idol row from the `idols` table.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Idol {
    pub id: DbId,
    pub player_profile_id: DbId,
    pub name: String,
    pub rarity: String,
    pub vocal: i16,
    pub dance: i16,
    pub visual: i16,
    pub charm: i16,
    pub stamina: i16,
    pub popularity: i64,
    pub training_until: Option<Timestamp>,
    pub sprite_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Idol {
    /// Weighted composite of the five stats.
    pub fn star_power(&self) -> i32 {
        star_power(self.vocal, self.dance, self.visual, self.charm, self.stamina)
    }
}

/// DTO for persisting a generated draft as an owned idol.
pub struct CreateIdol {
    pub player_profile_id: DbId,
    pub name: String,
    pub rarity: String,
    pub vocal: i16,
    pub dance: i16,
    pub visual: i16,
    pub charm: i16,
    pub stamina: i16,
    pub sprite_key: String,
}

impl CreateIdol {
    /// Bind a rolled draft to its new owner.
    pub fn from_draft(profile_id: DbId, draft: IdolDraft) -> Self {
        Self {
            player_profile_id: profile_id,
            name: draft.name,
            rarity: draft.rarity.as_str().to_string(),
            vocal: draft.vocal,
            dance: draft.dance,
            visual: draft.visual,
            charm: draft.charm,
            stamina: draft.stamina,
            sprite_key: draft.sprite_key,
        }
    }
}

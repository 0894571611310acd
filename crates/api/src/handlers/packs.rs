//! Handlers for the `/packs` resource (ephemeral idol pack offers).
//!
//! Opening a pack is free to view: the drafts and the quoted cost sit in
//! the in-process cache for ten minutes. Claiming charges the quote,
//! persists the chosen draft, and consumes the offer -- exactly once.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use encore_core::error::GameError;
use encore_core::idol::{self, IdolDraft};
use encore_core::ledger;
use encore_core::manager::BonusKind;
use encore_db::models::idol::{CreateIdol, Idol};
use encore_db::models::player::PlayerProfile;
use encore_db::repositories::{IdolRepo, ManagerRepo, PlayerRepo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthPlayer;
use crate::pack_cache::{ClaimError, PackOffer, PACK_TTL_SECS};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /packs/{id}/choose`.
#[derive(Debug, Deserialize)]
pub struct ChooseIdolRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct OpenPackResponse {
    pub pack_id: Uuid,
    pub cost: i64,
    pub idols: Vec<IdolDraft>,
    /// Seconds until the offer evaporates.
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct ChooseIdolResponse {
    pub idol: Idol,
    pub player: PlayerProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/packs
///
/// Quote a five-draft pack. The balance is only checked, not charged --
/// the debit happens at claim time against a fresh balance.
pub async fn open(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<OpenPackResponse>>> {
    // 1. Affordability quote; the real debit happens at claim time.
    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    ledger::check_debit(profile.money, idol::PACK_COST, "money")?;

    // 2. Roll the drafts with the scouting bonus in effect.
    let manager = ManagerRepo::find_selected(&state.pool, player.profile_id).await?;
    let quality_bonus = manager
        .map(|m| m.bonus_for(BonusKind::ScoutingQuality))
        .unwrap_or(0.0);

    let drafts: Vec<IdolDraft> = {
        let mut rng = rand::rng();
        (0..idol::PACK_SIZE)
            .map(|_| idol::generate_draft(&mut rng, quality_bonus))
            .collect()
    };

    // 3. Park the offer in the cache.
    let now = Utc::now();
    let pack_id = state
        .packs
        .put(
            PackOffer {
                owner: player.profile_id,
                drafts: drafts.clone(),
                cost: idol::PACK_COST,
                expires_at: now + Duration::seconds(PACK_TTL_SECS),
            },
            now,
        )
        .await;

    tracing::info!(profile_id = player.profile_id, %pack_id, "Pack opened");

    Ok(Json(DataResponse {
        data: OpenPackResponse {
            pack_id,
            cost: idol::PACK_COST,
            idols: drafts,
            expires_in: PACK_TTL_SECS,
        },
    }))
}

/// POST /api/v1/packs/{id}/choose
///
/// Claim one draft from an open pack. The cache claim is atomic, so two
/// concurrent calls can never both recruit from the same pack.
pub async fn choose(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(pack_id): Path<Uuid>,
    Json(input): Json<ChooseIdolRequest>,
) -> AppResult<Json<DataResponse<ChooseIdolResponse>>> {
    // 1. Bounds-check the index before consuming anything.
    if input.index >= idol::PACK_SIZE {
        return Err(AppError::Game(GameError::InvalidSelection(format!(
            "index must be below {}",
            idol::PACK_SIZE
        ))));
    }

    // 2. Atomically take the offer out of the cache.
    let offer = state
        .packs
        .claim(pack_id, player.profile_id, Utc::now())
        .await
        .map_err(|e| match e {
            ClaimError::Expired => AppError::Game(GameError::PackExpired),
            ClaimError::NotOwner => AppError::Game(GameError::NotOwner { entity: "pack" }),
        })?;

    let chosen = offer
        .drafts
        .into_iter()
        .nth(input.index)
        .ok_or_else(|| AppError::Game(GameError::InvalidSelection("no such draft".into())))?;

    // 3. Charge the quoted cost against the current balance and persist
    //    the recruit.
    let mut tx = state.pool.begin().await?;
    if !PlayerRepo::try_debit_money(&mut *tx, player.profile_id, offer.cost).await? {
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource: "money",
            required: offer.cost,
        }));
    }
    let created =
        IdolRepo::create(&mut *tx, &CreateIdol::from_draft(player.profile_id, chosen)).await?;
    let profile = PlayerRepo::add_experience(&mut *tx, player.profile_id, idol::SCOUT_XP).await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        %pack_id,
        idol_id = created.id,
        "Pack claimed"
    );

    Ok(Json(DataResponse {
        data: ChooseIdolResponse {
            idol: created,
            player: profile,
        },
    }))
}

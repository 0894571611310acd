//! Handlers for the `/upgrades` resource (agency upgrade tracks).

use axum::extract::State;
use axum::Json;
use encore_core::error::GameError;
use encore_core::upgrade::{self, UpgradeKind, UpgradeProgress};
use encore_db::models::player::PlayerProfile;
use encore_db::repositories::{PlayerRepo, UpgradeRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /upgrades/purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseUpgradeRequest {
    pub kind: UpgradeKind,
}

#[derive(Debug, Serialize)]
pub struct UpgradeCatalogResponse {
    pub upgrades: Vec<UpgradeProgress>,
    pub player: PlayerProfile,
}

/// GET /api/v1/upgrades
///
/// Every track with the profile's level, current bonus, and next cost.
pub async fn index(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UpgradeCatalogResponse>>> {
    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    let upgrades = catalog(&state, player.profile_id).await?;

    Ok(Json(DataResponse {
        data: UpgradeCatalogResponse {
            upgrades,
            player: profile,
        },
    }))
}

/// POST /api/v1/upgrades/purchase
///
/// Buy the next level of a track, paying fans + reputation. The row lock
/// from `find_or_create` serializes concurrent purchases; the conditional
/// debit ensures both balances cover the cost or nothing changes.
pub async fn purchase(
    player: AuthPlayer,
    State(state): State<AppState>,
    Json(input): Json<PurchaseUpgradeRequest>,
) -> AppResult<Json<DataResponse<UpgradeCatalogResponse>>> {
    let kind = input.kind;

    let mut tx = state.pool.begin().await?;

    // 1. Lock (or create) the track row and check the cap.
    let track = UpgradeRepo::find_or_create(&mut *tx, player.profile_id, kind.as_str()).await?;
    upgrade::check_below_cap(kind, track.level)?;

    // 2. Conditionally pay the level's cost.
    let cost = upgrade::cost_for_next_level(kind, track.level);
    if !PlayerRepo::try_debit_fans_and_reputation(
        &mut *tx,
        player.profile_id,
        cost.fans,
        cost.reputation,
    )
    .await?
    {
        // Report whichever balance fell short.
        let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
        let (resource, required) = if profile.fans < cost.fans {
            ("fans", cost.fans)
        } else {
            ("reputation", cost.reputation)
        };
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource,
            required,
        }));
    }

    // 3. Advance the level; the cap re-check makes a raced purchase a
    //    clean failure instead of an over-level row.
    let advanced = UpgradeRepo::try_increment_level(&mut *tx, track.id, kind.config().max_level)
        .await?
        .ok_or(AppError::Game(GameError::AlreadyAtMax))?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        kind = %advanced.kind,
        level = advanced.level,
        "Upgrade purchased"
    );

    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    let upgrades = catalog(&state, player.profile_id).await?;
    Ok(Json(DataResponse {
        data: UpgradeCatalogResponse {
            upgrades,
            player: profile,
        },
    }))
}

/// Build the full catalog for a profile (absent rows are level 0).
async fn catalog(
    state: &AppState,
    profile_id: encore_core::types::DbId,
) -> AppResult<Vec<UpgradeProgress>> {
    let owned = UpgradeRepo::list_for_profile(&state.pool, profile_id).await?;

    Ok(UpgradeKind::ALL
        .into_iter()
        .map(|kind| {
            let level = owned
                .iter()
                .find(|row| row.kind == kind.as_str())
                .map_or(0, |row| row.level);
            upgrade::progress(kind, level)
        })
        .collect())
}

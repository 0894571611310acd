//! Handlers for the `/idols` resource (roster, scouting, training, release).

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use encore_core::error::GameError;
use encore_core::idol::{self, StatKind};
use encore_core::manager::BonusKind;
use encore_core::types::{DbId, Timestamp};
use encore_db::models::idol::{CreateIdol, Idol};
use encore_db::models::player::PlayerProfile;
use encore_db::repositories::{IdolRepo, ManagerRepo, PlayerRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /idols/{id}/train`.
#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub stat: StatKind,
}

/// An idol row plus its derived fields.
#[derive(Debug, Serialize)]
pub struct IdolView {
    #[serde(flatten)]
    pub idol: Idol,
    pub star_power: i32,
    pub is_training: bool,
    /// The group the idol currently performs in, if any.
    pub group_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct ScoutResponse {
    pub idol: Idol,
    pub player: PlayerProfile,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub idol: Idol,
    pub stat_increased: StatKind,
    pub increase_amount: i16,
    pub training_ends_at: Timestamp,
    pub player: PlayerProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/idols
///
/// The full roster with derived star power, training state, and group
/// membership.
pub async fn index(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<IdolView>>>> {
    let idols = IdolRepo::list_for_profile(&state.pool, player.profile_id).await?;
    let memberships: HashMap<DbId, DbId> =
        IdolRepo::group_memberships_for_profile(&state.pool, player.profile_id)
            .await?
            .into_iter()
            .collect();

    let now = Utc::now();
    let views = idols
        .into_iter()
        .map(|idol| IdolView {
            star_power: idol.star_power(),
            is_training: idol::is_training(idol.training_until, now),
            group_id: memberships.get(&idol.id).copied(),
            idol,
        })
        .collect();

    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/idols/scout
///
/// Pay the scouting fee and roll a fresh idol onto the roster.
pub async fn scout(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<ScoutResponse>>)> {
    // 1. Resolve the scouting-quality bonus before rolling.
    let manager = ManagerRepo::find_selected(&state.pool, player.profile_id).await?;
    let quality_bonus = manager
        .map(|m| m.bonus_for(BonusKind::ScoutingQuality))
        .unwrap_or(0.0);

    // 2. Roll the draft. The RNG is scoped so it never crosses an await.
    let draft = {
        let mut rng = rand::rng();
        idol::generate_draft(&mut rng, quality_bonus)
    };

    // 3. Debit, persist, and grant experience atomically.
    let mut tx = state.pool.begin().await?;
    if !PlayerRepo::try_debit_money(&mut *tx, player.profile_id, idol::SCOUT_COST).await? {
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource: "money",
            required: idol::SCOUT_COST,
        }));
    }
    let created =
        IdolRepo::create(&mut *tx, &CreateIdol::from_draft(player.profile_id, draft)).await?;
    let profile = PlayerRepo::add_experience(&mut *tx, player.profile_id, idol::SCOUT_XP).await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        idol_id = created.id,
        rarity = %created.rarity,
        "Idol scouted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ScoutResponse {
                idol: created,
                player: profile,
            },
        }),
    ))
}

/// POST /api/v1/idols/{id}/train
///
/// Pay the training fee, apply the stat gain immediately, and start the
/// timer that blocks re-training.
pub async fn train(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(idol_id): Path<DbId>,
    Json(input): Json<TrainRequest>,
) -> AppResult<Json<DataResponse<TrainResponse>>> {
    // 1. Ownership and busy checks.
    let idol = find_owned(&state, &player, idol_id).await?;

    let now = Utc::now();
    if idol::is_training(idol.training_until, now) {
        return Err(AppError::Game(GameError::AlreadyTraining));
    }

    // 2. A training-speed manager shortens the timer.
    let manager = ManagerRepo::find_selected(&state.pool, player.profile_id).await?;
    let speed_bonus = manager
        .map(|m| m.bonus_for(BonusKind::TrainingSpeed))
        .unwrap_or(0.0);
    let duration = chrono::Duration::minutes(idol::training_duration_mins(speed_bonus));

    let gain = {
        let mut rng = rand::rng();
        idol::roll_training_gain(&mut rng)
    };

    // 3. Debit and apply. The gain lands immediately; the timer only gates
    //    the next session.
    let current = match input.stat {
        StatKind::Vocal => idol.vocal,
        StatKind::Dance => idol.dance,
        StatKind::Visual => idol.visual,
        StatKind::Charm => idol.charm,
        StatKind::Stamina => idol.stamina,
    };
    let new_value = idol::apply_training(current, gain);
    let training_ends_at = now + duration;

    let mut tx = state.pool.begin().await?;
    if !PlayerRepo::try_debit_money(&mut *tx, player.profile_id, idol::TRAINING_COST).await? {
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource: "money",
            required: idol::TRAINING_COST,
        }));
    }
    IdolRepo::set_training(&mut *tx, idol.id, training_ends_at).await?;
    IdolRepo::set_stat(&mut *tx, idol.id, input.stat, new_value).await?;
    tx.commit().await?;

    let idol = IdolRepo::find_by_id(&state.pool, idol_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Idol",
            id: idol_id,
        }))?;
    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;

    Ok(Json(DataResponse {
        data: TrainResponse {
            idol,
            stat_increased: input.stat,
            increase_amount: gain,
            training_ends_at,
            player: profile,
        },
    }))
}

/// DELETE /api/v1/idols/{id}
///
/// Release an idol from the agency. Grouped idols must leave their group
/// first.
pub async fn release(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(idol_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let idol = find_owned(&state, &player, idol_id).await?;

    if IdolRepo::group_id_for(&state.pool, idol.id).await?.is_some() {
        return Err(AppError::Game(GameError::Constraint(
            "Remove idol from all groups before releasing".into(),
        )));
    }

    IdolRepo::delete(&state.pool, idol.id).await?;

    tracing::info!(profile_id = player.profile_id, idol_id, "Idol released");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch an idol and verify it belongs to the authenticated profile.
async fn find_owned(state: &AppState, player: &AuthPlayer, idol_id: DbId) -> AppResult<Idol> {
    let idol = IdolRepo::find_by_id(&state.pool, idol_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Idol",
            id: idol_id,
        }))?;

    if idol.player_profile_id != player.profile_id {
        return Err(AppError::Game(GameError::NotOwner { entity: "idol" }));
    }
    Ok(idol)
}

//! Handlers for the `/promotions` resource (campaigns).
//!
//! Committing to a campaign debits its cost and freezes the rolled rewards
//! on the row; the payout happens only through the explicit complete call
//! once the timer elapses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use encore_core::error::GameError;
use encore_core::manager::BonusKind;
use encore_core::promotion::{
    self, PromotionKind, PromotionStatus, RewardModifiers, RolledRewards,
};
use encore_core::song::{self, SongStatus};
use encore_core::types::DbId;
use encore_core::upgrade::{self, UpgradeKind};
use encore_db::models::player::PlayerProfile;
use encore_db::models::promotion::{CreatePromotion, Promotion};
use encore_db::repositories::{
    GroupRepo, ManagerRepo, PlayerRepo, PromotionRepo, SongRepo, UpgradeRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::groups;
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /promotions`.
#[derive(Debug, Deserialize)]
pub struct StartPromotionRequest {
    pub group_id: DbId,
    pub song_id: DbId,
    pub kind: PromotionKind,
}

/// A campaign row plus its derived status flags.
#[derive(Debug, Serialize)]
pub struct PromotionView {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub is_active: bool,
    pub is_ready: bool,
    pub is_completed: bool,
}

/// One catalog entry for `GET /promotions/available`. Viral odds stay
/// hidden from the client.
#[derive(Debug, Serialize)]
pub struct AvailablePromotion {
    pub kind: PromotionKind,
    pub name: &'static str,
    pub cost: i64,
    pub duration_minutes: i64,
    pub base_fans: i64,
    pub base_money: i64,
    pub base_reputation: i64,
    pub required_fans: i64,
    pub required_reputation: i64,
}

#[derive(Debug, Serialize)]
pub struct StartPromotionResponse {
    pub promotion: PromotionView,
    pub player: PlayerProfile,
}

#[derive(Debug, Serialize)]
pub struct CompletePromotionResponse {
    pub promotion: PromotionView,
    pub rewards: RolledRewards,
    pub player: PlayerProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/promotions
///
/// All campaigns for the profile, newest first.
pub async fn index(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PromotionView>>>> {
    let promotions = PromotionRepo::list_for_profile(&state.pool, player.profile_id).await?;
    let views = promotions.into_iter().map(view).collect();
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/promotions/available
///
/// The campaign catalog with costs, durations, and entry hints.
pub async fn available(
    _player: AuthPlayer,
) -> Json<DataResponse<Vec<AvailablePromotion>>> {
    let catalog = PromotionKind::ALL
        .into_iter()
        .map(|kind| {
            let config = kind.config();
            AvailablePromotion {
                kind,
                name: config.name,
                cost: config.cost,
                duration_minutes: config.duration_minutes,
                base_fans: config.base_fans,
                base_money: config.base_money,
                base_reputation: config.base_reputation,
                required_fans: config.required_fans,
                required_reputation: config.required_reputation,
            }
        })
        .collect();
    Json(DataResponse { data: catalog })
}

/// POST /api/v1/promotions
///
/// Commit a group + completed song to a campaign. Rewards are rolled now
/// with the modifiers currently in effect and locked in.
pub async fn start(
    player: AuthPlayer,
    State(state): State<AppState>,
    Json(input): Json<StartPromotionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<StartPromotionResponse>>)> {
    let config = input.kind.config();

    // 1. Ownership of both entities.
    let group = groups::find_owned(&state, &player, input.group_id).await?;

    let song = SongRepo::find_by_id(&state.pool, input.song_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Song",
            id: input.song_id,
        }))?;
    if song.player_profile_id != player.profile_id {
        return Err(AppError::Game(GameError::NotOwner { entity: "song" }));
    }

    // 2. The song must be out of production (committing the observation if
    //    the timer just elapsed) and belong to the chosen group.
    let now = Utc::now();
    let song = match song::derive_status(now, song.production_ends_at, song.completed_at) {
        SongStatus::InProduction => return Err(AppError::Game(GameError::NotReady)),
        SongStatus::Completed => SongRepo::commit_completion(&state.pool, song.id)
            .await?
            .ok_or(AppError::Game(GameError::NotFound {
                entity: "Song",
                id: input.song_id,
            }))?,
    };
    if song.group_id != group.id {
        return Err(AppError::Game(GameError::Constraint(
            "This song does not belong to this group".into(),
        )));
    }

    // 3. Gather the modifiers in effect right now.
    let avg_star_power = groups::average_star_power(&state.pool, group.id).await?;
    let manager = ManagerRepo::find_selected(&state.pool, player.profile_id).await?;
    let payout_level = UpgradeRepo::level_for(
        &state.pool,
        player.profile_id,
        UpgradeKind::PromoPayout.as_str(),
    )
    .await?;
    let virality_level = UpgradeRepo::level_for(
        &state.pool,
        player.profile_id,
        UpgradeKind::Virality.as_str(),
    )
    .await?;

    let modifiers = RewardModifiers {
        group_avg_star_power: avg_star_power,
        song_promotion_power: f64::from(song::promotion_power(
            song.quality,
            song.hype,
            avg_star_power,
        )),
        payout_bonus: manager
            .as_ref()
            .map_or(0.0, |m| m.bonus_for(BonusKind::PromotionBoost))
            + upgrade::bonus_at_level(UpgradeKind::PromoPayout, payout_level),
        virality_bonus: manager
            .as_ref()
            .map_or(0.0, |m| m.bonus_for(BonusKind::ViralityChance))
            + upgrade::bonus_at_level(UpgradeKind::Virality, virality_level),
    };

    // 4. Roll once; the outcome is frozen on the row.
    let rewards = {
        let mut rng = rand::rng();
        promotion::roll_rewards(input.kind, modifiers, &mut rng)
    };

    // 5. Debit and commit.
    let mut tx = state.pool.begin().await?;
    if !PlayerRepo::try_debit_money(&mut *tx, player.profile_id, config.cost).await? {
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource: "money",
            required: config.cost,
        }));
    }

    let created = PromotionRepo::create(
        &mut *tx,
        &CreatePromotion {
            player_profile_id: player.profile_id,
            group_id: group.id,
            song_id: song.id,
            kind: input.kind.as_str().to_string(),
            cost: config.cost,
            fan_reward: rewards.fans,
            money_reward: rewards.money,
            reputation_reward: rewards.reputation,
            went_viral: rewards.went_viral,
            started_at: now,
            ends_at: now + chrono::Duration::minutes(config.duration_minutes),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        promotion_id = created.id,
        kind = %created.kind,
        went_viral = created.went_viral,
        "Promotion started"
    );

    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StartPromotionResponse {
                promotion: view(created),
                player: profile,
            },
        }),
    ))
}

/// POST /api/v1/promotions/{id}/complete
///
/// Claim an elapsed campaign: credit the frozen rewards exactly once.
pub async fn complete(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(promotion_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompletePromotionResponse>>> {
    // 1. Ownership.
    let promotion = PromotionRepo::find_by_id(&state.pool, promotion_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Promotion",
            id: promotion_id,
        }))?;
    if promotion.player_profile_id != player.profile_id {
        return Err(AppError::Game(GameError::NotOwner { entity: "promotion" }));
    }

    // 2. Must be ready: past its end time and not yet claimed.
    match promotion::derive_status(Utc::now(), promotion.ends_at, promotion.completed_at) {
        PromotionStatus::Completed => {
            return Err(AppError::Game(GameError::AlreadyCompleted))
        }
        PromotionStatus::Active => return Err(AppError::Game(GameError::NotReady)),
        PromotionStatus::ReadyToComplete => {}
    }

    // 3. Stamp conditionally, then pay out inside the same transaction.
    //    Losing the stamp race resolves to already-completed, so rewards
    //    are granted at most once.
    let mut tx = state.pool.begin().await?;
    let stamped = PromotionRepo::try_complete(&mut *tx, promotion.id)
        .await?
        .ok_or(AppError::Game(GameError::AlreadyCompleted))?;

    PlayerRepo::credit(
        &mut *tx,
        player.profile_id,
        stamped.money_reward,
        stamped.fan_reward,
        stamped.reputation_reward,
    )
    .await?;
    GroupRepo::increment_popularity(
        &mut *tx,
        stamped.group_id,
        promotion::popularity_gain(stamped.fan_reward),
    )
    .await?;
    let profile =
        PlayerRepo::add_experience(&mut *tx, player.profile_id, promotion::COMPLETION_XP).await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        promotion_id,
        fans = stamped.fan_reward,
        money = stamped.money_reward,
        went_viral = stamped.went_viral,
        "Promotion completed"
    );

    let rewards = RolledRewards {
        fans: stamped.fan_reward,
        money: stamped.money_reward,
        reputation: stamped.reputation_reward,
        went_viral: stamped.went_viral,
    };

    Ok(Json(DataResponse {
        data: CompletePromotionResponse {
            promotion: view(stamped),
            rewards,
            player: profile,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn view(promotion: Promotion) -> PromotionView {
    let status = promotion::derive_status(Utc::now(), promotion.ends_at, promotion.completed_at);
    PromotionView {
        is_active: status == PromotionStatus::Active,
        is_ready: status == PromotionStatus::ReadyToComplete,
        is_completed: status == PromotionStatus::Completed,
        promotion,
    }
}

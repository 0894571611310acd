//! Handlers for the `/songs` resource (production).
//!
//! Song completion is lazy: every read derives the status from the clock
//! and commits the `completed_at` observation for elapsed productions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use encore_core::error::GameError;
use encore_core::group as group_rules;
use encore_core::song::{self, Genre, SongStatus};
use encore_core::types::DbId;
use encore_core::upgrade::{self, UpgradeKind};
use encore_db::models::player::PlayerProfile;
use encore_db::models::song::{CreateSong, Song};
use encore_db::repositories::{PlayerRepo, SongRepo, UpgradeRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{validate_request, AppError, AppResult};
use crate::handlers::groups;
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /songs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSongRequest {
    pub group_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub genre: Genre,
}

/// A song row plus its derived fields.
#[derive(Debug, Serialize)]
pub struct SongView {
    #[serde(flatten)]
    pub song: Song,
    pub is_completed: bool,
    pub is_in_production: bool,
    pub promotion_power: i32,
}

#[derive(Debug, Serialize)]
pub struct ProduceResponse {
    pub song: SongView,
    pub player: PlayerProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/songs
pub async fn index(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SongView>>>> {
    let songs = SongRepo::list_for_profile(&state.pool, player.profile_id).await?;

    let mut views = Vec::new();
    for song in songs {
        views.push(refresh_view(&state, song).await?);
    }
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/songs
///
/// Start producing a song for one of the player's groups.
pub async fn store(
    player: AuthPlayer,
    State(state): State<AppState>,
    Json(input): Json<CreateSongRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProduceResponse>>)> {
    validate_request(&input)?;

    // 1. The group must be the player's own; its line-up drives quality.
    let group = groups::find_owned(&state, &player, input.group_id).await?;
    let avg_star_power = groups::average_star_power(&state.pool, group.id).await?;

    // 2. Roll quality, hype, and a title if none was given.
    let (quality, hype, title) = {
        let mut rng = rand::rng();
        let base = song::roll_base_quality(&mut rng);
        let quality = song::final_quality(base, group_rules::song_quality_bonus(avg_star_power));
        let hype = song::roll_hype(&mut rng);
        let title = input.title.clone().unwrap_or_else(|| song::generate_title(&mut rng));
        (quality, hype, title)
    };

    // 3. The production-speed upgrade shortens the timer.
    let speed_level = UpgradeRepo::level_for(
        &state.pool,
        player.profile_id,
        UpgradeKind::ProductionSpeed.as_str(),
    )
    .await?;
    let speed_bonus = upgrade::bonus_at_level(UpgradeKind::ProductionSpeed, speed_level);
    let duration = chrono::Duration::minutes(song::production_duration_mins(speed_bonus));

    // 4. Debit and create atomically.
    let mut tx = state.pool.begin().await?;
    if !PlayerRepo::try_debit_money(&mut *tx, player.profile_id, song::BASE_PRODUCTION_COST).await?
    {
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource: "money",
            required: song::BASE_PRODUCTION_COST,
        }));
    }

    let created = SongRepo::create(
        &mut *tx,
        &CreateSong {
            player_profile_id: player.profile_id,
            group_id: group.id,
            title,
            genre: input.genre.as_str().to_string(),
            quality,
            hype,
            production_cost: song::BASE_PRODUCTION_COST,
            production_ends_at: Utc::now() + duration,
        },
    )
    .await?;

    let profile =
        PlayerRepo::add_experience(&mut *tx, player.profile_id, song::PRODUCTION_XP).await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        song_id = created.id,
        quality = created.quality,
        "Song production started"
    );

    let view = view_with_power(created, avg_star_power);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProduceResponse {
                song: view,
                player: profile,
            },
        }),
    ))
}

/// GET /api/v1/songs/{id}
pub async fn show(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(song_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SongView>>> {
    let song = SongRepo::find_by_id(&state.pool, song_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Song",
            id: song_id,
        }))?;
    if song.player_profile_id != player.profile_id {
        return Err(AppError::Game(GameError::NotOwner { entity: "song" }));
    }

    Ok(Json(DataResponse {
        data: refresh_view(&state, song).await?,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Derive the song's status, committing the completion stamp for an elapsed
/// production, and assemble the view.
pub(crate) async fn refresh_view(state: &AppState, song: Song) -> AppResult<SongView> {
    let now = Utc::now();
    let status = song::derive_status(now, song.production_ends_at, song.completed_at);

    // Commit the observation the first time an elapsed song is read.
    let song = if status == SongStatus::Completed && song.completed_at.is_none() {
        SongRepo::commit_completion(&state.pool, song.id)
            .await?
            .unwrap_or(song)
    } else {
        song
    };

    let avg_star_power = groups::average_star_power(&state.pool, song.group_id).await?;
    Ok(view_with_power(song, avg_star_power))
}

fn view_with_power(song: Song, group_avg_star_power: f64) -> SongView {
    let now = Utc::now();
    let status = song::derive_status(now, song.production_ends_at, song.completed_at);

    SongView {
        is_completed: status == SongStatus::Completed,
        is_in_production: status == SongStatus::InProduction,
        promotion_power: song::promotion_power(song.quality, song.hype, group_avg_star_power),
        song,
    }
}

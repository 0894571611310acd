//! Handlers for the `/player` resource.

use axum::extract::State;
use axum::Json;
use encore_core::error::GameError;
use encore_db::models::idol::Idol;
use encore_db::models::manager::Manager;
use encore_db::models::player::PlayerProfile;
use encore_db::models::song::Song;
use encore_db::repositories::{GroupRepo, IdolRepo, ManagerRepo, PlayerRepo, SongRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{validate_request, AppError, AppResult};
use crate::handlers::groups::{group_view, GroupView};
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /player`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 255))]
    pub agency_name: String,
}

/// The full dashboard payload: ledger plus everything it owns.
#[derive(Debug, Serialize)]
pub struct PlayerOverview {
    pub player: PlayerProfile,
    pub manager: Option<Manager>,
    pub idols: Vec<Idol>,
    pub groups: Vec<GroupView>,
    pub songs: Vec<Song>,
}

/// GET /api/v1/player
///
/// The profile with manager, roster, groups (with members), and songs.
pub async fn show(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PlayerOverview>>> {
    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    let manager = ManagerRepo::find_selected(&state.pool, profile.id).await?;
    let idols = IdolRepo::list_for_profile(&state.pool, profile.id).await?;
    let songs = SongRepo::list_for_profile(&state.pool, profile.id).await?;

    let mut groups = Vec::new();
    for group in GroupRepo::list_for_profile(&state.pool, profile.id).await? {
        groups.push(group_view(&state.pool, group).await?);
    }

    Ok(Json(DataResponse {
        data: PlayerOverview {
            player: profile,
            manager,
            idols,
            groups,
            songs,
        },
    }))
}

/// PUT /api/v1/player
///
/// Rename the agency.
pub async fn update(
    player: AuthPlayer,
    State(state): State<AppState>,
    Json(input): Json<UpdatePlayerRequest>,
) -> AppResult<Json<DataResponse<PlayerProfile>>> {
    validate_request(&input)?;

    let updated = PlayerRepo::rename_agency(&state.pool, player.profile_id, &input.agency_name)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "PlayerProfile",
            id: player.profile_id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

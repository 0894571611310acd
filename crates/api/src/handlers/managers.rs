//! Handlers for the `/managers` catalog.

use axum::extract::State;
use axum::Json;
use encore_core::error::GameError;
use encore_core::types::DbId;
use encore_db::models::manager::Manager;
use encore_db::models::player::PlayerProfile;
use encore_db::repositories::{ManagerRepo, PlayerRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /managers/select`.
#[derive(Debug, Deserialize)]
pub struct SelectManagerRequest {
    pub manager_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct SelectManagerResponse {
    pub player: PlayerProfile,
    pub manager: Manager,
}

/// GET /api/v1/managers
///
/// The global manager catalog.
pub async fn index(
    _player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Manager>>>> {
    let managers = ManagerRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: managers }))
}

/// POST /api/v1/managers/select
///
/// Select (or switch) the agency's manager.
pub async fn select(
    player: AuthPlayer,
    State(state): State<AppState>,
    Json(input): Json<SelectManagerRequest>,
) -> AppResult<Json<DataResponse<SelectManagerResponse>>> {
    let manager = ManagerRepo::find_by_id(&state.pool, input.manager_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Manager",
            id: input.manager_id,
        }))?;

    let updated = PlayerRepo::set_manager(&state.pool, player.profile_id, manager.id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "PlayerProfile",
            id: player.profile_id,
        }))?;

    tracing::info!(
        profile_id = updated.id,
        manager_id = manager.id,
        "Manager selected"
    );

    Ok(Json(DataResponse {
        data: SelectManagerResponse {
            player: updated,
            manager,
        },
    }))
}

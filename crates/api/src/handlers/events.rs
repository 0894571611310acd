//! Handler for `/events/pulse` -- request-driven idle happenings.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use encore_core::events::{self, PulseEvent};
use encore_db::models::player::PlayerProfile;
use encore_db::repositories::{IdolRepo, PlayerRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PulseResponse {
    pub events: Vec<PulseEvent>,
    pub player: PlayerProfile,
}

/// POST /api/v1/events/pulse
///
/// Roll a handful of idle events against the roster and credit the
/// windfalls. The frontend calls this while the dashboard is open; there
/// is no scheduler behind it.
pub async fn pulse(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PulseResponse>>> {
    let idols = IdolRepo::list_for_profile(&state.pool, player.profile_id).await?;
    let roster: Vec<_> = idols.into_iter().map(|i| (i.id, i.name)).collect();

    let rolled = {
        let mut rng = rand::rng();
        events::roll_events(&mut rng, &roster, Utc::now())
    };

    let total_money: i64 = rolled.iter().map(|e| e.money).sum();
    let total_fans: i64 = rolled.iter().map(|e| e.fans).sum();

    if total_money > 0 || total_fans > 0 {
        let mut tx = state.pool.begin().await?;
        PlayerRepo::credit(&mut *tx, player.profile_id, total_money, total_fans, 0).await?;
        tx.commit().await?;
    }

    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    Ok(Json(DataResponse {
        data: PulseResponse {
            events: rolled,
            player: profile,
        },
    }))
}

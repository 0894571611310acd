//! Handlers for the `/groups` resource (debut, line-up management).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use encore_core::error::GameError;
use encore_core::group::{self, Concept, MemberStats};
use encore_core::types::DbId;
use encore_db::models::group::{CreateGroup, Group};
use encore_db::models::idol::Idol;
use encore_db::models::player::PlayerProfile;
use encore_db::models::song::Song;
use encore_db::repositories::{GroupRepo, IdolRepo, PlayerRepo, SongRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{validate_request, AppError, AppResult};
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /groups`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub concept: Concept,
    pub member_ids: Vec<DbId>,
}

/// Request body for `PUT /groups/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub concept: Option<Concept>,
}

/// Request body for `POST /groups/{id}/members`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub idol_id: DbId,
    #[validate(length(max = 50))]
    pub position: Option<String>,
}

/// A group row with its line-up and recomputed aggregates.
#[derive(Debug, Serialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<Idol>,
    pub member_count: usize,
    pub average_star_power: f64,
    pub total_star_power: i64,
}

/// The detail payload adds per-stat averages and the discography.
#[derive(Debug, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub view: GroupView,
    pub average_vocal: f64,
    pub average_dance: f64,
    pub average_visual: f64,
    pub songs: Vec<Song>,
}

#[derive(Debug, Serialize)]
pub struct DebutResponse {
    pub group: GroupView,
    pub player: PlayerProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/groups
pub async fn index(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<GroupView>>>> {
    let mut views = Vec::new();
    for group in GroupRepo::list_for_profile(&state.pool, player.profile_id).await? {
        views.push(group_view(&state.pool, group).await?);
    }
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/groups
///
/// Debut a new group: 2-7 owned, ungrouped idols, paid from the ledger.
pub async fn store(
    player: AuthPlayer,
    State(state): State<AppState>,
    Json(input): Json<CreateGroupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DebutResponse>>)> {
    validate_request(&input)?;
    group::validate_debut_size(input.member_ids.len())?;

    // 1. Every candidate must exist, belong to this profile, and be free.
    for &idol_id in &input.member_ids {
        let idol = IdolRepo::find_by_id(&state.pool, idol_id)
            .await?
            .filter(|idol| idol.player_profile_id == player.profile_id)
            .ok_or_else(|| {
                AppError::Game(GameError::Validation("Some idols do not belong to you".into()))
            })?;

        if IdolRepo::group_id_for(&state.pool, idol.id).await?.is_some() {
            return Err(AppError::Game(GameError::Constraint(format!(
                "{} is already in another group",
                idol.name
            ))));
        }
    }

    // 2. Pay the debut cost, create the group, attach the line-up.
    let mut tx = state.pool.begin().await?;
    if !PlayerRepo::try_debit_money(&mut *tx, player.profile_id, group::CREATION_COST).await? {
        return Err(AppError::Game(GameError::InsufficientFunds {
            resource: "money",
            required: group::CREATION_COST,
        }));
    }

    let created = GroupRepo::create(
        &mut *tx,
        &CreateGroup {
            player_profile_id: player.profile_id,
            name: input.name.clone(),
            concept: input.concept.as_str().to_string(),
            debut_date: Utc::now().date_naive(),
        },
    )
    .await?;

    for &idol_id in &input.member_ids {
        GroupRepo::add_member(&mut *tx, created.id, idol_id, None).await?;
    }

    let profile = PlayerRepo::add_experience(&mut *tx, player.profile_id, group::DEBUT_XP).await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = player.profile_id,
        group_id = created.id,
        members = input.member_ids.len(),
        "Group debuted"
    );

    let view = group_view(&state.pool, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DebutResponse {
                group: view,
                player: profile,
            },
        }),
    ))
}

/// GET /api/v1/groups/{id}
pub async fn show(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<GroupDetail>>> {
    let group = find_owned(&state, &player, group_id).await?;

    let view = group_view(&state.pool, group).await?;
    let stats = member_stats(&view.members);
    let songs = SongRepo::list_for_profile(&state.pool, player.profile_id)
        .await?
        .into_iter()
        .filter(|song| song.group_id == group_id)
        .collect();

    Ok(Json(DataResponse {
        data: GroupDetail {
            average_vocal: group::average_stat(&stats, |m| m.vocal),
            average_dance: group::average_stat(&stats, |m| m.dance),
            average_visual: group::average_stat(&stats, |m| m.visual),
            songs,
            view,
        },
    }))
}

/// PUT /api/v1/groups/{id}
///
/// Rename the group or change its concept.
pub async fn update(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<UpdateGroupRequest>,
) -> AppResult<Json<DataResponse<GroupView>>> {
    validate_request(&input)?;
    find_owned(&state, &player, group_id).await?;

    let updated = GroupRepo::update(
        &state.pool,
        group_id,
        input.name.as_deref(),
        input.concept.map(Concept::as_str),
    )
    .await?
    .ok_or(AppError::Game(GameError::NotFound {
        entity: "Group",
        id: group_id,
    }))?;

    Ok(Json(DataResponse {
        data: group_view(&state.pool, updated).await?,
    }))
}

/// POST /api/v1/groups/{id}/members
///
/// Add an owned, ungrouped idol to the line-up.
pub async fn add_member(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<Json<DataResponse<GroupView>>> {
    validate_request(&input)?;
    find_owned(&state, &player, group_id).await?;

    let idol = IdolRepo::find_by_id(&state.pool, input.idol_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Idol",
            id: input.idol_id,
        }))?;
    if idol.player_profile_id != player.profile_id {
        return Err(AppError::Game(GameError::NotOwner { entity: "idol" }));
    }
    if IdolRepo::group_id_for(&state.pool, idol.id).await?.is_some() {
        return Err(AppError::Game(GameError::Constraint(format!(
            "{} is already in another group",
            idol.name
        ))));
    }

    // Lock the group row so concurrent line-up changes serialize against
    // the member ceiling.
    let mut tx = state.pool.begin().await?;
    let group = GroupRepo::find_for_update(&mut *tx, group_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;
    let count = GroupRepo::member_count(&mut *tx, group_id).await?;
    group::check_can_add(count as usize)?;
    GroupRepo::add_member(&mut *tx, group_id, idol.id, input.position.as_deref()).await?;
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: group_view(&state.pool, group).await?,
    }))
}

/// DELETE /api/v1/groups/{id}/members/{idol_id}
///
/// Remove an idol from the line-up, never shrinking below the floor.
pub async fn remove_member(
    player: AuthPlayer,
    State(state): State<AppState>,
    Path((group_id, idol_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<GroupView>>> {
    find_owned(&state, &player, group_id).await?;

    let mut tx = state.pool.begin().await?;
    let group = GroupRepo::find_for_update(&mut *tx, group_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;
    let count = GroupRepo::member_count(&mut *tx, group_id).await?;
    group::check_can_remove(count as usize)?;

    if !GroupRepo::remove_member(&mut *tx, group_id, idol_id).await? {
        return Err(AppError::Game(GameError::Validation(
            "Idol is not a member of this group".into(),
        )));
    }
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: group_view(&state.pool, group).await?,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a group and verify it belongs to the authenticated profile.
pub(crate) async fn find_owned(
    state: &AppState,
    player: &AuthPlayer,
    group_id: DbId,
) -> AppResult<Group> {
    let group = GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;

    if group.player_profile_id != player.profile_id {
        return Err(AppError::Game(GameError::NotOwner { entity: "group" }));
    }
    Ok(group)
}

/// Assemble a [`GroupView`] by loading the line-up and recomputing the
/// aggregates.
pub(crate) async fn group_view(pool: &encore_db::DbPool, group: Group) -> AppResult<GroupView> {
    let members = GroupRepo::members(pool, group.id).await?;
    let stats = member_stats(&members);

    Ok(GroupView {
        member_count: members.len(),
        average_star_power: group::average_star_power(&stats),
        total_star_power: group::total_star_power(&stats),
        members,
        group,
    })
}

/// The average star power of a group's current line-up.
pub(crate) async fn average_star_power(
    pool: &encore_db::DbPool,
    group_id: DbId,
) -> AppResult<f64> {
    let members = GroupRepo::members(pool, group_id).await?;
    Ok(group::average_star_power(&member_stats(&members)))
}

fn member_stats(members: &[Idol]) -> Vec<MemberStats> {
    members
        .iter()
        .map(|idol| MemberStats {
            vocal: idol.vocal,
            dance: idol.dance,
            visual: idol.visual,
            charm: idol.charm,
            stamina: idol.stamina,
        })
        .collect()
}

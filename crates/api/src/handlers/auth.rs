//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use encore_core::error::GameError;
use encore_db::models::manager::Manager;
use encore_db::models::player::{CreateProfile, PlayerProfile};
use encore_db::models::user::{CreateUser, User};
use encore_db::repositories::{ManagerRepo, PlayerRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{validate_request, AppError, AppResult};
use crate::middleware::auth::AuthPlayer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(max = 255))]
    pub agency_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
    pub player: PlayerProfile,
}

/// Response for `GET /me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub player: PlayerProfile,
    pub manager: Option<Manager>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create the account and its player profile in one transaction, then issue
/// an access token.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    validate_request(&input)?;

    // 1. Reject duplicate emails up front for a friendly message; the
    //    unique index still backs this under races.
    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Game(GameError::Constraint(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    // 2. Create user + profile atomically.
    let agency_name = input
        .agency_name
        .clone()
        .unwrap_or_else(|| format!("{}'s Agency", input.display_name));

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            email: input.email.clone(),
            display_name: input.display_name.clone(),
            password_hash,
        },
    )
    .await?;
    let player = PlayerRepo::create(
        &mut *tx,
        &CreateProfile {
            user_id: user.id,
            agency_name,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, profile_id = player.id, "Account registered");

    // 3. Issue the access token.
    let response = auth_response(&state, user, player)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    // 1. Find the account. A missing user and a bad password produce the
    //    same message.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Game(GameError::Unauthorized("Invalid email or password".into()))
        })?;

    // 2. Verify the password.
    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Game(GameError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    // 3. Load the profile and issue the token.
    let player = PlayerRepo::find_by_user_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Profile missing for user {}", user.id)))?;

    tracing::info!(user_id = user.id, "Login succeeded");

    let response = auth_response(&state, user, player)?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Access tokens are stateless, so logout is a client-side discard; the
/// endpoint exists for the frontend's session flow. Returns 204.
pub async fn logout(_player: AuthPlayer) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /api/v1/me
///
/// The authenticated account with its profile and selected manager.
pub async fn me(
    player: AuthPlayer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, player.user_id)
        .await?
        .ok_or(AppError::Game(GameError::NotFound {
            entity: "User",
            id: player.user_id,
        }))?;
    let profile = super::fetch_profile(&state.pool, player.profile_id).await?;
    let manager = ManagerRepo::find_selected(&state.pool, profile.id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user,
            player: profile,
            manager,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate an access token and assemble the auth payload.
fn auth_response(
    state: &AppState,
    user: User,
    player: PlayerProfile,
) -> Result<AuthResponse, AppError> {
    let access_token = generate_access_token(user.id, player.id, &state.config.jwt)
        .map_err(|e| AppError::Internal(format!("Token generation error: {e}")))?;
    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        expires_in,
        user,
        player,
    })
}

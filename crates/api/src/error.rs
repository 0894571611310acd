use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use encore_core::error::GameError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`GameError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the shape `{ "error": <message>, "code": <stable code> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `encore_core`.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Game(game) => classify_game_error(game),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to an HTTP status, stable code, and message.
fn classify_game_error(err: &GameError) -> (StatusCode, &'static str, String) {
    let status = match err {
        GameError::NotFound { .. } => StatusCode::NOT_FOUND,
        GameError::NotOwner { .. } => StatusCode::FORBIDDEN,
        GameError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };

    let code = match err {
        GameError::NotFound { .. } => "NOT_FOUND",
        GameError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        GameError::NotOwner { .. } => "NOT_OWNER",
        GameError::AlreadyAtMax => "MAX_LEVEL",
        GameError::AlreadyCompleted => "ALREADY_COMPLETED",
        GameError::NotReady => "NOT_READY",
        GameError::AlreadyTraining => "ALREADY_TRAINING",
        GameError::InvalidSelection(_) => "INVALID_SELECTION",
        GameError::PackExpired => "PACK_EXPIRED",
        GameError::Constraint(_) => "CONSTRAINT_VIOLATION",
        GameError::Validation(_) => "VALIDATION_ERROR",
        GameError::Unauthorized(_) => "UNAUTHORIZED",
        GameError::Internal(_) => "INTERNAL_ERROR",
    };

    let message = match err {
        GameError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal domain error");
            "An internal error occurred".to_string()
        }
        other => other.to_string(),
    };

    (status, code, message)
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Run `validator` checks on a request body, mapping failures to a domain
/// validation error.
pub fn validate_request<T: validator::Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Game(GameError::Validation(e.to_string())))
}

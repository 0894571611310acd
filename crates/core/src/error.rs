use crate::types::DbId;

/// Domain-level failure taxonomy.
///
/// Every variant is an expected, caller-recoverable condition; the API layer
/// maps each to an HTTP status and a stable error code. Unexpected storage
/// failures are not represented here -- they surface as `sqlx::Error` and
/// become generic 500s.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Not enough {resource}: need {required}")]
    InsufficientFunds {
        resource: &'static str,
        required: i64,
    },

    #[error("This {entity} does not belong to you")]
    NotOwner { entity: &'static str },

    #[error("Upgrade is already at max level")]
    AlreadyAtMax,

    #[error("Already completed")]
    AlreadyCompleted,

    #[error("Still in progress")]
    NotReady,

    #[error("This idol is already training")]
    AlreadyTraining,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Pack has expired or was already claimed")]
    PackExpired,

    #[error("{0}")]
    Constraint(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

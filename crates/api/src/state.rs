use std::sync::Arc;

use crate::config::ServerConfig;
use crate::pack_cache::PackCache;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: encore_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Ephemeral idol-pack offers (in-process TTL cache).
    pub packs: Arc<PackCache>,
}

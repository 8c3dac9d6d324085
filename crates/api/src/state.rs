use std::sync::Arc;
use std::time::Duration;

use crate::cache::OwnerWaitlistCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: waitlist_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-owner cache of the dashboard waitlist list.
    pub waitlist_cache: Arc<OwnerWaitlistCache>,
}

impl AppState {
    pub fn new(pool: waitlist_db::DbPool, config: ServerConfig) -> Self {
        let waitlist_cache = OwnerWaitlistCache::new(
            config.waitlist_cache_capacity,
            Duration::from_secs(config.waitlist_cache_ttl_secs),
        );
        Self {
            pool,
            config: Arc::new(config),
            waitlist_cache: Arc::new(waitlist_cache),
        }
    }
}

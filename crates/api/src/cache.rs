//! In-process cache of each owner's waitlist list.
//!
//! Filled on `GET /waitlists` and dropped for an owner whenever one of their
//! waitlists is created or changes. Entries hold plain waitlist rows (no
//! signup counts), so public signups never make them stale. Capacity and TTL
//! bound memory for owners who stop coming back.

use std::time::Duration;

use moka::future::Cache;
use waitlist_core::types::DbId;
use waitlist_db::models::waitlist::Waitlist;

/// Owner id -> that owner's waitlists, newest first.
#[derive(Debug, Clone)]
pub struct OwnerWaitlistCache {
    inner: Cache<DbId, Vec<Waitlist>>,
}

impl OwnerWaitlistCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cached list for `owner_id`, if present and not expired.
    pub async fn get(&self, owner_id: DbId) -> Option<Vec<Waitlist>> {
        self.inner.get(&owner_id).await
    }

    pub async fn insert(&self, owner_id: DbId, waitlists: Vec<Waitlist>) {
        self.inner.insert(owner_id, waitlists).await;
    }

    /// Drop the cached list for `owner_id`.
    pub async fn invalidate(&self, owner_id: DbId) {
        self.inner.invalidate(&owner_id).await;
    }

    /// Number of owners with a cached list, after pending evictions run.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

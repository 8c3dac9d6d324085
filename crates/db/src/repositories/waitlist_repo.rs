//! Repository for the `waitlists` table.

use sqlx::PgPool;
use waitlist_core::types::DbId;

use crate::models::waitlist::{CreateWaitlist, PublicWaitlistRow, Waitlist, WidgetSourceRow};

/// Column list for `waitlists` queries.
const COLUMNS: &str = "id, name, slug, owner_id, customization, created_at, updated_at";

/// Provides create, lookup, and customization updates for waitlists.
pub struct WaitlistRepo;

impl WaitlistRepo {
    /// Insert a new waitlist, returning the created row.
    ///
    /// A duplicate slug surfaces as a unique violation on `uq_waitlists_slug`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateWaitlist,
    ) -> Result<Waitlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO waitlists (name, slug, owner_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Waitlist>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a waitlist by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Waitlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlists WHERE id = $1");
        sqlx::query_as::<_, Waitlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a waitlist by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Waitlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlists WHERE slug = $1");
        sqlx::query_as::<_, Waitlist>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any waitlist already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM waitlists WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// List an owner's waitlists, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Waitlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM waitlists \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Waitlist>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Public summary by slug: waitlist, owner display fields, signup count.
    pub async fn find_public_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<PublicWaitlistRow>, sqlx::Error> {
        sqlx::query_as::<_, PublicWaitlistRow>(
            "SELECT w.id, w.name, w.slug, w.created_at, \
                    u.name AS owner_name, u.email AS owner_email, \
                    (SELECT COUNT(*) FROM signups s WHERE s.waitlist_id = w.id) AS signup_count \
             FROM waitlists w \
             JOIN users u ON u.id = w.owner_id \
             WHERE w.slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Everything the widget configuration resolver reads, in one query.
    pub async fn find_widget_source(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<WidgetSourceRow>, sqlx::Error> {
        sqlx::query_as::<_, WidgetSourceRow>(
            "SELECT w.id, w.name, w.slug, w.customization, \
                    (SELECT COUNT(*) FROM signups s WHERE s.waitlist_id = w.id) AS signup_count \
             FROM waitlists w \
             WHERE w.slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Replace the stored customization blob. Returns `None` if no row matched.
    pub async fn update_customization(
        pool: &PgPool,
        id: DbId,
        customization: &serde_json::Value,
    ) -> Result<Option<Waitlist>, sqlx::Error> {
        let query = format!(
            "UPDATE waitlists SET customization = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Waitlist>(&query)
            .bind(id)
            .bind(customization)
            .fetch_optional(pool)
            .await
    }
}

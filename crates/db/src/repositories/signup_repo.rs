//! Repository for the `signups` table.
//!
//! Besides plain inserts and lookups this holds the aggregate queries behind
//! ranking, referral counts, and analytics. All of them are scoped to one
//! waitlist.

use sqlx::PgPool;
use waitlist_core::types::{DbId, Timestamp};

use crate::models::signup::{DailySignupCount, NewSignup, ReferralCountRow, Signup};

/// Column list for `signups` queries.
const COLUMNS: &str = "\
    id, waitlist_id, email, name, referral_id, referred_by, created_at, updated_at";

/// Unique constraint on `(waitlist_id, email)`.
pub const UQ_WAITLIST_EMAIL: &str = "uq_signups_waitlist_email";

/// Unique constraint on `referral_id`.
pub const UQ_REFERRAL_ID: &str = "uq_signups_referral_id";

/// Provides signup persistence and per-waitlist aggregates.
pub struct SignupRepo;

impl SignupRepo {
    /// Insert a signup, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewSignup) -> Result<Signup, sqlx::Error> {
        let query = format!(
            "INSERT INTO signups (waitlist_id, email, name, referral_id, referred_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Signup>(&query)
            .bind(input.waitlist_id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.referral_id)
            .bind(&input.referred_by)
            .fetch_one(pool)
            .await
    }

    /// Whether `email` has already joined the waitlist.
    pub async fn exists(pool: &PgPool, waitlist_id: DbId, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM signups WHERE waitlist_id = $1 AND email = $2)",
        )
        .bind(waitlist_id)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// All signups of a waitlist, newest first.
    pub async fn list_for_waitlist(
        pool: &PgPool,
        waitlist_id: DbId,
    ) -> Result<Vec<Signup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM signups \
             WHERE waitlist_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Signup>(&query)
            .bind(waitlist_id)
            .fetch_all(pool)
            .await
    }

    /// Find the signup owning `referral_id` within a waitlist.
    pub async fn find_by_referral_id(
        pool: &PgPool,
        waitlist_id: DbId,
        referral_id: &str,
    ) -> Result<Option<Signup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM signups WHERE waitlist_id = $1 AND referral_id = $2"
        );
        sqlx::query_as::<_, Signup>(&query)
            .bind(waitlist_id)
            .bind(referral_id)
            .fetch_optional(pool)
            .await
    }

    /// Total signups of a waitlist.
    pub async fn count_for_waitlist(pool: &PgPool, waitlist_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM signups WHERE waitlist_id = $1")
            .bind(waitlist_id)
            .fetch_one(pool)
            .await
    }

    /// 1-based rank of `signup` by join time.
    ///
    /// Counts strictly earlier signups, breaking equal timestamps by id, so
    /// two signups never share a position.
    pub async fn position(pool: &PgPool, signup: &Signup) -> Result<i64, sqlx::Error> {
        let earlier = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM signups \
             WHERE waitlist_id = $1 \
               AND (created_at < $2 OR (created_at = $2 AND id < $3))",
        )
        .bind(signup.waitlist_id)
        .bind(signup.created_at)
        .bind(signup.id)
        .fetch_one(pool)
        .await?;
        Ok(earlier + 1)
    }

    /// Referral counts per token in one grouped query.
    ///
    /// Ordered by most recent referral first; the leaderboard relies on this
    /// order to break ties.
    pub async fn referral_counts(
        pool: &PgPool,
        waitlist_id: DbId,
    ) -> Result<Vec<ReferralCountRow>, sqlx::Error> {
        sqlx::query_as::<_, ReferralCountRow>(
            "SELECT referred_by, COUNT(*) AS referral_count \
             FROM signups \
             WHERE waitlist_id = $1 AND referred_by IS NOT NULL AND referred_by <> '' \
             GROUP BY referred_by \
             ORDER BY MAX(created_at) DESC, referred_by",
        )
        .bind(waitlist_id)
        .fetch_all(pool)
        .await
    }

    /// Number of signups in the waitlist that joined through `referral_id`.
    pub async fn referral_count_for(
        pool: &PgPool,
        waitlist_id: DbId,
        referral_id: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM signups WHERE waitlist_id = $1 AND referred_by = $2",
        )
        .bind(waitlist_id)
        .bind(referral_id)
        .fetch_one(pool)
        .await
    }

    /// Signups created strictly before `before`.
    pub async fn count_created_before(
        pool: &PgPool,
        waitlist_id: DbId,
        before: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM signups WHERE waitlist_id = $1 AND created_at < $2",
        )
        .bind(waitlist_id)
        .bind(before)
        .fetch_one(pool)
        .await
    }

    /// Signups with `from <= created_at`, and `created_at < until` when given.
    pub async fn count_created_between(
        pool: &PgPool,
        waitlist_id: DbId,
        from: Timestamp,
        until: Option<Timestamp>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM signups \
             WHERE waitlist_id = $1 \
               AND created_at >= $2 \
               AND ($3::timestamptz IS NULL OR created_at < $3)",
        )
        .bind(waitlist_id)
        .bind(from)
        .bind(until)
        .fetch_one(pool)
        .await
    }

    /// Signups per UTC calendar day from `since` onward, oldest day first.
    /// Days without signups are absent.
    pub async fn daily_counts(
        pool: &PgPool,
        waitlist_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<DailySignupCount>, sqlx::Error> {
        sqlx::query_as::<_, DailySignupCount>(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS signup_count \
             FROM signups \
             WHERE waitlist_id = $1 AND created_at >= $2 \
             GROUP BY day \
             ORDER BY day",
        )
        .bind(waitlist_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}

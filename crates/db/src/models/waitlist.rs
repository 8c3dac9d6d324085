//! Waitlist entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waitlist_core::types::{DbId, Timestamp};

/// A row from the `waitlists` table.
///
/// `customization` is the stored partial blob, returned as-is. Readers that
/// need resolved values go through `waitlist_core::customization`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Waitlist {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub owner_id: DbId,
    pub customization: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a waitlist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWaitlist {
    pub name: String,
    pub slug: String,
}

/// Public summary: waitlist, owner display fields, and signup count.
#[derive(Debug, Clone, FromRow)]
pub struct PublicWaitlistRow {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub owner_name: Option<String>,
    pub owner_email: String,
    pub signup_count: i64,
}

/// What the widget resolver needs: identity, stored blob, and signup count.
#[derive(Debug, Clone, FromRow)]
pub struct WidgetSourceRow {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub customization: Option<serde_json::Value>,
    pub signup_count: i64,
}

//! Signup entity model and aggregate projections.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use waitlist_core::referral::Referrable;
use waitlist_core::types::{DbId, Timestamp};

/// A row from the `signups` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    pub id: DbId,
    pub waitlist_id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub referral_id: String,
    pub referred_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Referrable for Signup {
    fn referral_id(&self) -> &str {
        &self.referral_id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn email(&self) -> &str {
        &self.email
    }
}

/// Insert parameters. The referral token is generated by the caller.
#[derive(Debug, Clone)]
pub struct NewSignup {
    pub waitlist_id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub referral_id: String,
    pub referred_by: Option<String>,
}

/// One row of the `GROUP BY referred_by` count query.
#[derive(Debug, Clone, FromRow)]
pub struct ReferralCountRow {
    pub referred_by: String,
    pub referral_count: i64,
}

/// Signups per UTC calendar day.
#[derive(Debug, Clone, FromRow)]
pub struct DailySignupCount {
    pub day: NaiveDate,
    pub signup_count: i64,
}

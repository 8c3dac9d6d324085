//! Public, slug-addressed waitlist endpoints (plus the owner check used by
//! the public page to show owner controls).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use waitlist_core::error::CoreError;
use waitlist_core::ownership::check_ownership;
use waitlist_core::types::{DbId, Timestamp};
use waitlist_db::repositories::{SignupRepo, WaitlistRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn waitlist_not_found(slug: &str) -> CoreError {
    CoreError::SlugNotFound {
        entity: "Waitlist",
        slug: slug.to_string(),
    }
}

// ---------------------------------------------------------------------------
// GET /waitlist/{slug}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OwnerDisplay {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicWaitlist {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub owner: OwnerDisplay,
    pub signup_count: i64,
}

/// Public summary of a waitlist.
pub async fn get_public_waitlist(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let row = WaitlistRepo::find_public_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| waitlist_not_found(&slug))?;

    Ok(Json(PublicWaitlist {
        id: row.id,
        name: row.name,
        slug: row.slug,
        created_at: row.created_at,
        owner: OwnerDisplay {
            name: row.owner_name,
            email: row.owner_email,
        },
        signup_count: row.signup_count,
    }))
}

// ---------------------------------------------------------------------------
// GET /waitlist/{slug}/owner-check
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCheck {
    pub is_owner: bool,
}

/// Whether the authenticated caller owns the waitlist.
pub async fn owner_check(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let waitlist = WaitlistRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| waitlist_not_found(&slug))?;

    let is_owner = check_ownership(auth.user_id, Some(waitlist.owner_id)).is_owner();
    Ok(Json(OwnerCheck { is_owner }))
}

// ---------------------------------------------------------------------------
// GET /waitlist/{slug}/referral/{referral_id}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStatus {
    pub referral_id: String,
    pub referral_count: i64,
    pub position: i64,
}

/// Standing of one signup: how many people it referred and its position.
pub async fn referral_status(
    State(state): State<AppState>,
    Path((slug, referral_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let waitlist = WaitlistRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| waitlist_not_found(&slug))?;

    let signup = SignupRepo::find_by_referral_id(&state.pool, waitlist.id, &referral_id)
        .await?
        .ok_or_else(|| CoreError::SlugNotFound {
            entity: "Signup",
            slug: referral_id.clone(),
        })?;

    let referral_count =
        SignupRepo::referral_count_for(&state.pool, waitlist.id, &signup.referral_id).await?;
    let position = SignupRepo::position(&state.pool, &signup).await?;

    Ok(Json(ReferralStatus {
        referral_id: signup.referral_id,
        referral_count,
        position,
    }))
}

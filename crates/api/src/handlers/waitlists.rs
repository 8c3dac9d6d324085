//! Owner dashboard handlers for waitlists.
//!
//! Everything here requires authentication. Routes under `/waitlists/{id}`
//! additionally require the caller to own the waitlist (see
//! [`OwnedWaitlist`]).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use waitlist_core::customization::PartialCustomization;
use waitlist_core::embed::{EmbedCode, EmbedOptions};
use waitlist_core::error::CoreError;
use waitlist_core::referral::{ReferralGraph, TopReferrer, LEADERBOARD_SIZE};
use waitlist_core::slug::{validate_slug, validate_waitlist_name};
use waitlist_core::types::{DbId, Timestamp};
use waitlist_db::is_unique_violation;
use waitlist_db::models::waitlist::CreateWaitlist;
use waitlist_db::repositories::{SignupRepo, UserRepo, WaitlistRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::OwnedWaitlist;
use crate::response::DataResponse;
use crate::state::AppState;

const MSG_DUPLICATE_SLUG: &str = "A waitlist with this slug already exists";
const MSG_NAME_AND_SLUG_REQUIRED: &str = "Name and slug are required";

// ---------------------------------------------------------------------------
// POST /waitlists
// ---------------------------------------------------------------------------

/// Create a waitlist owned by the caller.
pub async fn create_waitlist(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreateWaitlist>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(_) => {
            AppError::Core(CoreError::Validation(MSG_NAME_AND_SLUG_REQUIRED.into()))
        }
        other => AppError::BadRequest(other.body_text()),
    })?;
    validate_waitlist_name(&input.name)?;
    validate_slug(&input.slug)?;

    if UserRepo::find_by_id(&state.pool, auth.user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Unknown user".into(),
        )));
    }

    if WaitlistRepo::slug_exists(&state.pool, &input.slug).await? {
        return Err(AppError::Core(CoreError::Conflict(MSG_DUPLICATE_SLUG.into())));
    }

    let input = CreateWaitlist {
        name: input.name.trim().to_string(),
        slug: input.slug,
    };
    let waitlist = WaitlistRepo::create(&state.pool, auth.user_id, &input)
        .await
        .map_err(|err| {
            if is_unique_violation(&err, "uq_waitlists_slug") {
                AppError::Core(CoreError::Conflict(MSG_DUPLICATE_SLUG.into()))
            } else {
                AppError::Database(err)
            }
        })?;

    state.waitlist_cache.invalidate(auth.user_id).await;

    tracing::info!(
        waitlist_id = waitlist.id,
        slug = %waitlist.slug,
        user_id = auth.user_id,
        "Waitlist created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: waitlist })))
}

// ---------------------------------------------------------------------------
// GET /waitlists
// ---------------------------------------------------------------------------

/// List the caller's waitlists, newest first.
pub async fn list_waitlists(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if let Some(cached) = state.waitlist_cache.get(auth.user_id).await {
        tracing::debug!(user_id = auth.user_id, "Waitlist list served from cache");
        return Ok(Json(DataResponse { data: cached }));
    }

    let waitlists = WaitlistRepo::list_by_owner(&state.pool, auth.user_id).await?;
    state
        .waitlist_cache
        .insert(auth.user_id, waitlists.clone())
        .await;

    Ok(Json(DataResponse { data: waitlists }))
}

// ---------------------------------------------------------------------------
// GET /waitlists/{id}
// ---------------------------------------------------------------------------

/// One signup in the overview, joined with its referral data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSignup {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub referral_id: String,
    pub referred_by: Option<String>,
    pub created_at: Timestamp,
    pub referral_count: i64,
    pub referrer_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistOverview {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub signup_count: i64,
    pub signups: Vec<OverviewSignup>,
    pub top_referrers: Vec<TopReferrer>,
}

/// Waitlist detail with every signup (newest first) and the leaderboard.
pub async fn get_overview(
    OwnedWaitlist { waitlist, .. }: OwnedWaitlist,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let signups = SignupRepo::list_for_waitlist(&state.pool, waitlist.id).await?;
    let counts = SignupRepo::referral_counts(&state.pool, waitlist.id).await?;
    let graph = ReferralGraph::new(
        &signups,
        counts.into_iter().map(|r| (r.referred_by, r.referral_count)),
    );

    let rows = signups
        .iter()
        .map(|s| OverviewSignup {
            id: s.id,
            email: s.email.clone(),
            name: s.name.clone(),
            referral_id: s.referral_id.clone(),
            referred_by: s.referred_by.clone(),
            created_at: s.created_at,
            referral_count: graph.referral_count(&s.referral_id),
            referrer_name: graph.referrer_name(s.referred_by.as_deref()),
        })
        .collect::<Vec<_>>();

    let overview = WaitlistOverview {
        id: waitlist.id,
        name: waitlist.name,
        slug: waitlist.slug,
        created_at: waitlist.created_at,
        signup_count: rows.len() as i64,
        top_referrers: graph.top_referrers(LEADERBOARD_SIZE),
        signups: rows,
    };

    Ok(Json(DataResponse { data: overview }))
}

// ---------------------------------------------------------------------------
// PATCH /waitlists/{id}/customization
// ---------------------------------------------------------------------------

/// Overlay a partial customization onto the stored blob.
///
/// Every supplied field is validated; out-of-range values are rejected
/// rather than clamped. Defaults are never written.
pub async fn update_customization(
    OwnedWaitlist { user, waitlist }: OwnedWaitlist,
    State(state): State<AppState>,
    body: Result<Json<PartialCustomization>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(update) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    update.validate()?;

    let (stored, ignored) = PartialCustomization::from_stored(waitlist.customization.as_ref());
    if !ignored.0.is_empty() {
        tracing::warn!(
            waitlist_id = waitlist.id,
            keys = %ignored,
            "Dropping unreadable customization keys",
        );
    }

    let merged = serde_json::to_value(stored.overlay(&update))
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let updated = WaitlistRepo::update_customization(&state.pool, waitlist.id, &merged)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Waitlist",
            id: waitlist.id,
        })?;

    state.waitlist_cache.invalidate(user.user_id).await;

    tracing::info!(waitlist_id = updated.id, user_id = user.user_id, "Customization updated");

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /waitlists/{id}/embed-code
// ---------------------------------------------------------------------------

/// Query parameters for embed code generation. Missing values use the
/// defaults (500x400, default button text and color).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedCodeParams {
    pub width: Option<String>,
    pub height: Option<String>,
    pub button_text: Option<String>,
    pub color: Option<String>,
}

impl EmbedCodeParams {
    fn into_options(self) -> EmbedOptions {
        let defaults = EmbedOptions::default();
        let pick = |value: Option<String>, default: String| {
            value.filter(|v| !v.trim().is_empty()).unwrap_or(default)
        };
        EmbedOptions {
            width: pick(self.width, defaults.width),
            height: pick(self.height, defaults.height),
            button_text: pick(self.button_text, defaults.button_text),
            color: pick(self.color, defaults.color),
        }
    }
}

/// Embed URL plus ready-to-paste iframe and script snippets.
pub async fn get_embed_code(
    OwnedWaitlist { waitlist, .. }: OwnedWaitlist,
    State(state): State<AppState>,
    Query(params): Query<EmbedCodeParams>,
) -> AppResult<impl IntoResponse> {
    let code = EmbedCode::generate(
        &state.config.public_base_url,
        &waitlist.slug,
        &params.into_options(),
    )?;
    Ok(Json(DataResponse { data: code }))
}

//! Public signup endpoint.
//!
//! Every outcome is a `{success, message, ...}` body so the widget can show
//! the message inline; the HTTP status carries the error class.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use waitlist_core::error::CoreError;
use waitlist_core::referral::generate_referral_id;
use waitlist_core::signup::{
    normalize_signup, NormalizedSignup, SignupResult, MSG_ALREADY_JOINED, MSG_INVALID_FORM,
    MSG_UNEXPECTED, MSG_WAITLIST_NOT_FOUND,
};
use waitlist_core::types::DbId;
use waitlist_db::is_unique_violation;
use waitlist_db::models::signup::NewSignup;
use waitlist_db::repositories::signup_repo::{UQ_REFERRAL_ID, UQ_WAITLIST_EMAIL};
use waitlist_db::repositories::{SignupRepo, WaitlistRepo};

use crate::state::AppState;

/// Attempts at finding an unused referral token before giving up.
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Request body for `POST /waitlist/{slug}/signup`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub name: Option<String>,
    pub referred_by: Option<String>,
}

/// Why a signup did not go through.
#[derive(Debug)]
pub enum SignupFailure {
    WaitlistNotFound,
    Invalid(String),
    AlreadyJoined,
    Unexpected(String),
}

impl SignupFailure {
    fn status(&self) -> StatusCode {
        match self {
            SignupFailure::WaitlistNotFound => StatusCode::NOT_FOUND,
            SignupFailure::Invalid(_) => StatusCode::BAD_REQUEST,
            SignupFailure::AlreadyJoined => StatusCode::CONFLICT,
            SignupFailure::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_result(self) -> SignupResult {
        match self {
            SignupFailure::WaitlistNotFound => SignupResult::rejected(MSG_WAITLIST_NOT_FOUND),
            SignupFailure::Invalid(msg) => SignupResult::rejected(msg),
            SignupFailure::AlreadyJoined => SignupResult::rejected(MSG_ALREADY_JOINED),
            SignupFailure::Unexpected(_) => SignupResult::rejected(MSG_UNEXPECTED),
        }
    }
}

impl From<sqlx::Error> for SignupFailure {
    fn from(err: sqlx::Error) -> Self {
        SignupFailure::Unexpected(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// POST /waitlist/{slug}/signup
// ---------------------------------------------------------------------------

pub async fn signup(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> (StatusCode, Json<SignupResult>) {
    match handle_signup(&state, &slug, body).await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(failure) => {
            if let SignupFailure::Unexpected(ref error) = failure {
                tracing::error!(%slug, %error, "Signup failed");
            }
            (failure.status(), Json(failure.into_result()))
        }
    }
}

async fn handle_signup(
    state: &AppState,
    slug: &str,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<SignupResult, SignupFailure> {
    let waitlist = WaitlistRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or(SignupFailure::WaitlistNotFound)?;

    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(%slug, error = %rejection.body_text(), "Malformed signup body");
        SignupFailure::Invalid(MSG_INVALID_FORM.to_string())
    })?;

    let input = normalize_signup(
        &request.email,
        request.name.as_deref(),
        request.referred_by.as_deref(),
    )
    .map_err(|e| match e {
        CoreError::Validation(msg) => SignupFailure::Invalid(msg),
        other => SignupFailure::Unexpected(other.to_string()),
    })?;

    let referred = input.is_referred();
    let result = perform_signup(state, waitlist.id, input).await?;

    tracing::info!(
        waitlist_id = waitlist.id,
        position = result.position,
        referred,
        "Signup recorded",
    );
    Ok(result)
}

/// Persist a validated signup and compute its position.
///
/// The existence check gives the friendly conflict in the common case; the
/// unique index decides races. A referral token collision retries with a
/// fresh token.
pub async fn perform_signup(
    state: &AppState,
    waitlist_id: DbId,
    input: NormalizedSignup,
) -> Result<SignupResult, SignupFailure> {
    if SignupRepo::exists(&state.pool, waitlist_id, &input.email).await? {
        return Err(SignupFailure::AlreadyJoined);
    }

    let mut new_signup = NewSignup {
        waitlist_id,
        email: input.email,
        name: input.name,
        referral_id: generate_referral_id(),
        referred_by: input.referred_by,
    };

    let mut attempts = 0;
    let signup = loop {
        attempts += 1;
        match SignupRepo::create(&state.pool, &new_signup).await {
            Ok(signup) => break signup,
            Err(err) if is_unique_violation(&err, UQ_WAITLIST_EMAIL) => {
                return Err(SignupFailure::AlreadyJoined);
            }
            Err(err) if is_unique_violation(&err, UQ_REFERRAL_ID) && attempts < MAX_TOKEN_ATTEMPTS => {
                tracing::warn!(waitlist_id, attempts, "Referral token collision, regenerating");
                new_signup.referral_id = generate_referral_id();
            }
            Err(err) => return Err(err.into()),
        }
    };

    let position = SignupRepo::position(&state.pool, &signup).await?;
    Ok(SignupResult::joined(signup.referral_id, position))
}

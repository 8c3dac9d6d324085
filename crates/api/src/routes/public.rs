//! Public, slug-addressed waitlist routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{public, signup};
use crate::state::AppState;

/// ```text
/// GET   /waitlist/{slug}                            -> get_public_waitlist
/// POST  /waitlist/{slug}/signup                     -> signup
/// GET   /waitlist/{slug}/referral/{referral_id}     -> referral_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waitlist/{slug}", get(public::get_public_waitlist))
        .route("/waitlist/{slug}/signup", post(signup::signup))
        .route(
            "/waitlist/{slug}/referral/{referral_id}",
            get(public::referral_status),
        )
}

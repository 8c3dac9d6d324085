//! Owner dashboard routes.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{analytics, export, public, waitlists};
use crate::state::AppState;

/// ```text
/// GET, POST  /waitlists                        -> list_waitlists, create_waitlist
/// GET        /waitlists/{id}                   -> get_overview
/// GET        /waitlists/{id}/analytics         -> get_analytics
/// PATCH      /waitlists/{id}/customization     -> update_customization
/// GET        /waitlists/{id}/export            -> export_csv
/// GET        /waitlists/{id}/embed-code        -> get_embed_code
/// GET        /waitlist/{slug}/owner-check      -> owner_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/waitlists",
            get(waitlists::list_waitlists).post(waitlists::create_waitlist),
        )
        .route("/waitlists/{id}", get(waitlists::get_overview))
        .route("/waitlists/{id}/analytics", get(analytics::get_analytics))
        .route(
            "/waitlists/{id}/customization",
            patch(waitlists::update_customization),
        )
        .route("/waitlists/{id}/export", get(export::export_csv))
        .route("/waitlists/{id}/embed-code", get(waitlists::get_embed_code))
        .route("/waitlist/{slug}/owner-check", get(public::owner_check))
}

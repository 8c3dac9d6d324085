pub mod embed;
pub mod health;
pub mod public;
pub mod waitlists;
pub mod widget;

use axum::Router;

use crate::config::ServerConfig;
use crate::router::{build_cors_layer, build_public_cors_layer};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /waitlists                                   list, create (auth)
/// /waitlists/{id}                              overview (owner)
/// /waitlists/{id}/analytics                    daily series + metrics (owner)
/// /waitlists/{id}/customization                PATCH partial update (owner)
/// /waitlists/{id}/export                       CSV download (owner)
/// /waitlists/{id}/embed-code                   embed snippets (owner)
/// /waitlist/{slug}/owner-check                 {isOwner} (auth)
///
/// /waitlist/{slug}                             public summary
/// /waitlist/{slug}/signup                      public signup (POST)
/// /waitlist/{slug}/referral/{referral_id}      referral standing
/// /widget/{slug}/config                        resolved widget config
/// /widget/script                               widget JavaScript
/// ```
///
/// Dashboard routes only accept the configured CORS origins; public routes
/// accept any origin so the widget can run on third-party sites.
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    let dashboard = waitlists::router().layer(build_cors_layer(config));
    let public = public::router()
        .merge(widget::router())
        .layer(build_public_cors_layer());

    Router::new().merge(dashboard).merge(public)
}

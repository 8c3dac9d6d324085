use axum::routing::get;
use axum::Router;

use crate::handlers::embed;
use crate::state::AppState;

/// Mount the iframe embed page (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/embed/{slug}", get(embed::embed_page))
}

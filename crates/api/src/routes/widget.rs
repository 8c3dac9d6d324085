use axum::routing::get;
use axum::Router;

use crate::handlers::widget;
use crate::state::AppState;

/// ```text
/// GET  /widget/{slug}/config   -> widget_config
/// GET  /widget/script          -> widget_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/widget/{slug}/config", get(widget::widget_config))
        .route("/widget/script", get(widget::widget_script))
}

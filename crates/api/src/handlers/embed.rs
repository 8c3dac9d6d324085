//! Iframe embed page.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use waitlist_core::customization::{PartialCustomization, WidgetConfig};
use waitlist_core::embed::{render_embed_page, render_not_found_page};
use waitlist_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::handlers::widget::{load_widget_source, widget_waitlist};
use crate::state::AppState;

/// Widget script URL referenced by the embed page.
const WIDGET_SCRIPT_PATH: &str = "/api/v1/widget/script";

// ---------------------------------------------------------------------------
// GET /embed/{slug}
// ---------------------------------------------------------------------------

/// Self-contained HTML page rendering the widget.
///
/// Query parameters override stored customization for this page only.
pub async fn embed_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Response> {
    let (row, stored) = match load_widget_source(&state, &slug).await {
        Ok(found) => found,
        Err(AppError::Core(CoreError::SlugNotFound { .. })) => {
            let page = render_not_found_page(&slug)?;
            return Ok((StatusCode::NOT_FOUND, Html(page)).into_response());
        }
        Err(err) => return Err(err),
    };

    let overrides = PartialCustomization::from_query(&params);
    let config = WidgetConfig::resolve(widget_waitlist(&row), &stored.overlay(&overrides));
    let html = render_embed_page(&config, WIDGET_SCRIPT_PATH)?;

    Ok(Html(html).into_response())
}


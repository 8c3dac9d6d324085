//! Widget configuration and the embeddable widget script.

use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use waitlist_core::customization::{PartialCustomization, WidgetConfig, WidgetWaitlist};
use waitlist_core::error::CoreError;
use waitlist_db::models::waitlist::WidgetSourceRow;
use waitlist_db::repositories::WaitlistRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Self-initializing widget script served at `/widget/script`.
pub const WIDGET_SCRIPT: &str = include_str!("../../assets/widget.js");

const SCRIPT_CACHE_CONTROL: &str = "public, max-age=3600";

/// Load the widget source row and its stored customization.
///
/// Unreadable stored keys are logged and ignored.
pub async fn load_widget_source(
    state: &AppState,
    slug: &str,
) -> AppResult<(WidgetSourceRow, PartialCustomization)> {
    let row = WaitlistRepo::find_widget_source(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::SlugNotFound {
            entity: "Waitlist",
            slug: slug.to_string(),
        })?;

    let (stored, ignored) = PartialCustomization::from_stored(row.customization.as_ref());
    if !ignored.0.is_empty() {
        tracing::warn!(
            waitlist_id = row.id,
            keys = %ignored,
            "Ignoring unreadable customization keys",
        );
    }
    Ok((row, stored))
}

pub fn widget_waitlist(row: &WidgetSourceRow) -> WidgetWaitlist {
    WidgetWaitlist {
        id: row.id,
        name: row.name.clone(),
        slug: row.slug.clone(),
        signup_count: row.signup_count,
    }
}

// ---------------------------------------------------------------------------
// GET /widget/{slug}/config
// ---------------------------------------------------------------------------

/// Resolved widget configuration: stored customization merged with defaults.
pub async fn widget_config(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (row, stored) = load_widget_source(&state, &slug).await?;
    Ok(Json(WidgetConfig::resolve(widget_waitlist(&row), &stored)))
}

// ---------------------------------------------------------------------------
// GET /widget/script
// ---------------------------------------------------------------------------

pub async fn widget_script() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (CACHE_CONTROL, SCRIPT_CACHE_CONTROL),
        ],
        WIDGET_SCRIPT,
    )
}

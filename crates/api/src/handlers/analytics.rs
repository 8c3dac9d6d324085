//! Signup analytics for the owner dashboard.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use waitlist_core::analytics::{
    daily_series, DailyPoint, GrowthWindows, SeriesWindow, SignupMetrics, DEFAULT_WINDOW_DAYS,
};
use waitlist_core::error::CoreError;
use waitlist_db::repositories::SignupRepo;

use crate::error::AppResult;
use crate::middleware::ownership::OwnedWaitlist;
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest accepted `days` value.
const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    /// Series length in days (default 30).
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub analytics_data: Vec<DailyPoint>,
    pub metrics: SignupMetrics,
}

// ---------------------------------------------------------------------------
// GET /waitlists/{id}/analytics
// ---------------------------------------------------------------------------

/// Daily cumulative series plus weekly growth metrics.
pub async fn get_analytics(
    OwnedWaitlist { waitlist, .. }: OwnedWaitlist,
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<impl IntoResponse> {
    let window_days = params.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if window_days == 0 || window_days > MAX_WINDOW_DAYS {
        return Err(CoreError::Validation(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        ))
        .into());
    }

    let now = chrono::Utc::now();
    let window = SeriesWindow::ending_at(now, window_days);
    let growth = GrowthWindows::ending_at(now);
    let pool = &state.pool;

    let baseline = SignupRepo::count_created_before(pool, waitlist.id, window.start).await?;
    let daily: HashMap<_, _> = SignupRepo::daily_counts(pool, waitlist.id, window.start)
        .await?
        .into_iter()
        .map(|row| (row.day, row.signup_count))
        .collect();

    let total = SignupRepo::count_for_waitlist(pool, waitlist.id).await?;
    let last_7 =
        SignupRepo::count_created_between(pool, waitlist.id, growth.current_start, None).await?;
    let previous_7 = SignupRepo::count_created_between(
        pool,
        waitlist.id,
        growth.previous_start,
        Some(growth.current_start),
    )
    .await?;

    let response = AnalyticsResponse {
        analytics_data: daily_series(&window, baseline, &daily),
        metrics: SignupMetrics::new(total, last_7, previous_7),
    };

    Ok(Json(DataResponse { data: response }))
}

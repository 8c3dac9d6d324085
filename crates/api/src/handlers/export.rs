//! CSV export of a waitlist's signups.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::Response;
use waitlist_core::export::{export_filename, render_csv, ExportRow, CSV_CONTENT_TYPE};
use waitlist_core::referral::ReferralGraph;
use waitlist_db::repositories::SignupRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::OwnedWaitlist;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /waitlists/{id}/export
// ---------------------------------------------------------------------------

/// Download every signup as CSV, newest first.
pub async fn export_csv(
    OwnedWaitlist { waitlist, user }: OwnedWaitlist,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let signups = SignupRepo::list_for_waitlist(&state.pool, waitlist.id).await?;
    let counts = SignupRepo::referral_counts(&state.pool, waitlist.id).await?;
    let graph = ReferralGraph::new(
        &signups,
        counts.into_iter().map(|r| (r.referred_by, r.referral_count)),
    );

    let rows: Vec<ExportRow> = signups
        .iter()
        .map(|s| ExportRow {
            name: s.name.clone(),
            email: s.email.clone(),
            referral_count: graph.referral_count(&s.referral_id),
            referred_by: graph.referrer_name(s.referred_by.as_deref()),
            created_at: s.created_at,
            referral_id: s.referral_id.clone(),
        })
        .collect();

    let csv_output = render_csv(&rows);

    tracing::info!(
        waitlist_id = waitlist.id,
        user_id = user.user_id,
        rows = rows.len(),
        "Signups exported",
    );

    Response::builder()
        .status(200)
        .header(CONTENT_TYPE, CSV_CONTENT_TYPE)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export_filename(&waitlist.slug)),
        )
        .body(Body::from(csv_output))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

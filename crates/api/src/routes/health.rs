//! `GET /health`, mounted at the root rather than under `/api/v1` so load
//! balancers can reach it without knowing the API prefix.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use waitlist_core::types::Timestamp;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    /// Up, but Postgres did not answer. Signups and the dashboard will fail.
    Degraded,
}

impl ServiceStatus {
    fn http_status(self) -> StatusCode {
        match self {
            ServiceStatus::Ok => StatusCode::OK,
            ServiceStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round trip of `SELECT 1`, when it succeeded.
    pub db_latency_ms: Option<u128>,
    /// Owners with a cached dashboard list.
    pub cached_owners: u64,
    pub checked_at: Timestamp,
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();
    let db_latency_ms = match waitlist_db::health_check(&state.pool).await {
        Ok(()) => Some(started.elapsed().as_millis()),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            None
        }
    };

    let status = if db_latency_ms.is_some() {
        ServiceStatus::Ok
    } else {
        ServiceStatus::Degraded
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy: db_latency_ms.is_some(),
        db_latency_ms,
        cached_owners: state.waitlist_cache.entry_count().await,
        checked_at: chrono::Utc::now(),
    };
    (status.http_status(), Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_is_served_as_503() {
        assert_eq!(ServiceStatus::Ok.http_status(), StatusCode::OK);
        assert_eq!(
            ServiceStatus::Degraded.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            serde_json::to_value(ServiceStatus::Degraded).unwrap(),
            "degraded"
        );
    }
}

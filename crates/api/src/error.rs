//! HTTP error surface for the dashboard and widget routes.
//!
//! Every failure leaves the service as `{"error": <message>, "code": <CODE>}`.
//! Server-side failures are logged in full and answered with a fixed message;
//! nothing from the database (constraint names, SQL) reaches the caller.
//!
//! The public signup endpoint does not use this type; it always answers with
//! a `{success, message}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use waitlist_core::error::CoreError;

const MSG_INTERNAL: &str = "An internal error occurred";
const MSG_DUPLICATE: &str = "A resource with this value already exists";

/// Error returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain error from `waitlist_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An HTML page or embed snippet failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Malformed request the domain layer never saw (bad JSON, bad query).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// What an [`AppError`] turns into on the wire.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorReply {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ErrorReply {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", MSG_INTERNAL)
    }
}

impl AppError {
    /// Status, code and caller-facing message. Logs server-side failures.
    pub fn reply(&self) -> ErrorReply {
        match self {
            AppError::Core(core) => core_reply(core),
            AppError::Database(err) => database_reply(err),
            AppError::Render(err) => {
                tracing::error!(error = %err, "Template render failed");
                ErrorReply::internal()
            }
            AppError::BadRequest(msg) => {
                ErrorReply::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorReply::internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let ErrorReply {
            status,
            code,
            message,
        } = self.reply();
        (status, Json(ErrorBody { error: message, code })).into_response()
    }
}

fn core_reply(err: &CoreError) -> ErrorReply {
    match err {
        CoreError::NotFound { entity, id } => {
            ErrorReply::not_found(format!("{entity} with id {id} not found"))
        }
        // Slugs come from public URLs; they are not echoed back.
        CoreError::SlugNotFound { entity, .. } => ErrorReply::not_found(format!("{entity} not found")),
        CoreError::Validation(msg) => {
            ErrorReply::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::Conflict(msg) => ErrorReply::conflict(msg.clone()),
        CoreError::Unauthorized(msg) => {
            ErrorReply::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => ErrorReply::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            ErrorReply::internal()
        }
    }
}

/// `RowNotFound` is a 404 and a `uq_*` unique violation a 409. Anything else
/// is a 500. The constraint name is logged, never returned.
fn database_reply(err: &sqlx::Error) -> ErrorReply {
    match err {
        sqlx::Error::RowNotFound => ErrorReply::not_found("Resource not found"),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            tracing::info!(constraint = ?db_err.constraint(), "Unique constraint rejected write");
            ErrorReply::conflict(MSG_DUPLICATE)
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorReply::internal()
        }
    }
}

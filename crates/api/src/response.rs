//! Shared response envelope types for API handlers.
//!
//! Dashboard responses use a `{ "data": ... }` envelope. Public endpoints
//! consumed by the widget return bare JSON.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

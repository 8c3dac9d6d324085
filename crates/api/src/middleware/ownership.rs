//! Ownership gate for `/waitlists/{id}/...` routes.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use waitlist_core::ownership::check_ownership;
use waitlist_core::types::DbId;
use waitlist_db::models::waitlist::Waitlist;
use waitlist_db::repositories::WaitlistRepo;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The waitlist named by the `{id}` path segment, loaded only if the caller
/// owns it. Missing waitlists reject with 404 and foreign ones with 403.
///
/// ```ignore
/// async fn owner_only(OwnedWaitlist { user, waitlist }: OwnedWaitlist) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct OwnedWaitlist {
    pub user: AuthUser,
    pub waitlist: Waitlist,
}

impl FromRequestParts<AppState> for OwnedWaitlist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let waitlist = load_owned(state, &user, id).await?;
        Ok(OwnedWaitlist { user, waitlist })
    }
}

/// Load waitlist `id` and require `user` to own it.
pub async fn load_owned(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Waitlist> {
    let waitlist = WaitlistRepo::find_by_id(&state.pool, id).await?;
    check_ownership(user.user_id, waitlist.as_ref().map(|w| w.owner_id)).into_result(id)?;
    waitlist.ok_or_else(|| AppError::InternalError(format!(
        "Waitlist {id} vanished during ownership check"
    )))
}

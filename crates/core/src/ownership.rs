//! Owner-only access decision for waitlist resources.

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    NotOwner,
    NotFound,
}

/// Decide whether `caller` owns a waitlist. `owner_id` is `None` when the
/// waitlist does not exist.
pub fn check_ownership(caller: DbId, owner_id: Option<DbId>) -> Ownership {
    match owner_id {
        None => Ownership::NotFound,
        Some(owner) if owner == caller => Ownership::Owner,
        Some(_) => Ownership::NotOwner,
    }
}

impl Ownership {
    pub fn is_owner(self) -> bool {
        self == Ownership::Owner
    }

    /// Map the decision to an error for gated operations.
    pub fn into_result(self, waitlist_id: DbId) -> Result<(), CoreError> {
        match self {
            Ownership::Owner => Ok(()),
            Ownership::NotOwner => Err(CoreError::Forbidden(
                "You do not own this waitlist".into(),
            )),
            Ownership::NotFound => Err(CoreError::NotFound {
                entity: "Waitlist",
                id: waitlist_id,
            }),
        }
    }
}

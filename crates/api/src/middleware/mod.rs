//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`ownership::OwnedWaitlist`] -- Loads the `{id}` waitlist and requires the
//!   caller to own it.

pub mod auth;
pub mod ownership;

//! Domain logic for the waitlist service.
//!
//! Everything in this crate is pure: no database access and no HTTP. The
//! `db` crate supplies rows, the `api` crate supplies requests, and the
//! functions here decide what those mean.

pub mod analytics;
pub mod customization;
pub mod embed;
pub mod error;
pub mod export;
pub mod ownership;
pub mod referral;
pub mod signup;
pub mod slug;
pub mod types;

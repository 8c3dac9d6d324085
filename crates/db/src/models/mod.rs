//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts where the API accepts them
//! - Projection rows for aggregate queries

pub mod signup;
pub mod user;
pub mod waitlist;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod signup_repo;
pub mod user_repo;
pub mod waitlist_repo;

pub use signup_repo::SignupRepo;
pub use user_repo::UserRepo;
pub use waitlist_repo::WaitlistRepo;

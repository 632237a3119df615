//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod grant_repo;
pub mod status_repo;

pub use grant_repo::GrantRepo;
pub use status_repo::StatusRepo;

//! Repository layer for data access.

pub mod entities;
mod user_repository;

pub(crate) use user_repository::{load_user, map_user_write_error};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

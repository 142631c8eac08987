//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Both services and the gateway share these types.

pub mod catalog;
pub mod constants;
pub mod user;
pub mod validation;

pub use catalog::{ProductListing, ProductResponse};
pub use constants::*;
pub use user::{NewUser, Profile, ProfileInput, User, UserChanges, UserRecord, UserResponse};

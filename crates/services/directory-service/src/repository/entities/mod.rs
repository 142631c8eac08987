//! SeaORM entities owned by the directory service.

pub mod profile;
pub mod user;

//! Directory Service Library
//!
//! Users with a nested one-to-one profile. Creation and updates write both
//! rows in a single transaction.

pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use infra::Migrator;
pub use service::{UserManager, UserService};

use crate::infra::Persistence;

/// Build the user service on a shared connection.
pub fn user_service(db: DatabaseConnection) -> Arc<dyn UserService> {
    Arc::new(UserManager::new(Arc::new(Persistence::new(db))))
}

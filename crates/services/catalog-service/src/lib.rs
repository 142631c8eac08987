//! Catalog Service Library
//!
//! Categories and products, read through ranked analytical views.

pub mod infra;
pub mod repository;
pub mod seed;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use infra::Migrator;
pub use repository::RankedView;
pub use service::{CatalogManager, CatalogService};

use crate::repository::ProductStore;

/// Build the catalog service on a shared connection.
pub fn catalog_service(db: DatabaseConnection) -> Arc<dyn CatalogService> {
    Arc::new(CatalogManager::new(Arc::new(ProductStore::new(db))))
}

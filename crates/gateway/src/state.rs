//! Application state for dependency injection.

use std::sync::Arc;

use axum::extract::FromRef;

use catalog_service_lib::CatalogService;
use common::Database;
use directory_service_lib::UserService;

use crate::config::GatewayConfig;
use crate::extractors::PageSettings;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub catalog: Arc<dyn CatalogService>,
    pub database: Database,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        users: Arc<dyn UserService>,
        catalog: Arc<dyn CatalogService>,
        database: Database,
        config: GatewayConfig,
    ) -> Self {
        Self {
            users,
            catalog,
            database,
            config,
        }
    }

    /// Wire the real services onto one shared pool.
    pub fn from_database(database: Database, config: GatewayConfig) -> Self {
        let users = directory_service_lib::user_service(database.get_connection());
        let catalog = catalog_service_lib::catalog_service(database.get_connection());
        Self::new(users, catalog, database, config)
    }
}

impl FromRef<AppState> for PageSettings {
    fn from_ref(state: &AppState) -> Self {
        PageSettings {
            default_size: state.config.page_size,
            max_size: state.config.max_page_size,
        }
    }
}

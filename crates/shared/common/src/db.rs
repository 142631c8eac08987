//! Database connection and migration management.
//!
//! One connection pool is shared by every service; each service brings its
//! own `MigratorTrait` implementation with a separate history table.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::config::DatabaseConfig;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the connection pool. Migrations are run separately per service.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!(max_connections = config.max_connections, "Database connected");

        Ok(Self { connection })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations<M: MigratorTrait>(&self) -> Result<(), DbErr> {
        M::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration<M: MigratorTrait>(&self) -> Result<(), DbErr> {
        M::down(&self.connection, Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status<M: MigratorTrait>(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let migrations = M::get_migration_with_status(&self.connection)
            .await?
            .iter()
            .map(|m| {
                let is_applied = matches!(m.status(), MigrationStatus::Applied);
                (m.name().to_string(), is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Roll back every migration of `M`, then apply them again.
    ///
    /// Only the tables owned by `M` are touched, so other services sharing
    /// the database keep their data.
    pub async fn fresh_migrations<M: MigratorTrait>(&self) -> Result<(), DbErr> {
        M::refresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

//! Migration commands over both services' migrators.

use clap::{Subcommand, ValueEnum};
use tracing::info;

use catalog_service_lib::Migrator as CatalogMigrator;
use common::Database;
use directory_service_lib::Migrator as DirectoryMigrator;

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Roll back and re-apply every migration
    Fresh,
}

/// Which service's schema a migration command applies to
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceScope {
    Directory,
    Catalog,
    All,
}

impl ServiceScope {
    fn directory(self) -> bool {
        matches!(self, ServiceScope::Directory | ServiceScope::All)
    }

    fn catalog(self) -> bool {
        matches!(self, ServiceScope::Catalog | ServiceScope::All)
    }
}

pub async fn run(
    db: &Database,
    action: MigrateAction,
    scope: ServiceScope,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MigrateAction::Up => {
            if scope.directory() {
                db.run_migrations::<DirectoryMigrator>().await?;
            }
            if scope.catalog() {
                db.run_migrations::<CatalogMigrator>().await?;
            }
            info!(?scope, "Migrations applied successfully");
        }
        MigrateAction::Down => {
            // Reverse order of `up`
            if scope.catalog() {
                db.rollback_migration::<CatalogMigrator>().await?;
            }
            if scope.directory() {
                db.rollback_migration::<DirectoryMigrator>().await?;
            }
            info!(?scope, "Rolled back last migration");
        }
        MigrateAction::Status => {
            if scope.directory() {
                print_status("directory", db.migration_status::<DirectoryMigrator>().await?);
            }
            if scope.catalog() {
                print_status("catalog", db.migration_status::<CatalogMigrator>().await?);
            }
        }
        MigrateAction::Fresh => {
            if scope.directory() {
                db.fresh_migrations::<DirectoryMigrator>().await?;
            }
            if scope.catalog() {
                db.fresh_migrations::<CatalogMigrator>().await?;
            }
            info!(?scope, "Database reset and migrations applied");
        }
    }

    Ok(())
}

fn print_status(service: &str, status: Vec<(String, bool)>) {
    println!("{}:", service);
    for (name, applied) in status {
        let marker = if applied { "[x]" } else { "[ ]" };
        println!("  {} {}", marker, name);
    }
}

//! Infrastructure layer - migrations.

pub mod migrations;

pub use migrations::Migrator;

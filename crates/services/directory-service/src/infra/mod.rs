//! Infrastructure layer - migrations and transaction management.

pub mod migrations;
pub mod unit_of_work;

pub use migrations::Migrator;
pub use unit_of_work::{Persistence, TransactionContext, TxUserRepository, UnitOfWork};

//! Repository layer for data access.

pub mod entities;
mod product_repository;
pub mod ranking;

pub use product_repository::{ProductRepository, ProductStore};
pub use ranking::RankedView;

#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;

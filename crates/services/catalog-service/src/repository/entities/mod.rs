//! SeaORM entities owned by the catalog service.

pub mod category;
pub mod product;

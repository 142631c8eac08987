//! HTTP request handlers.

pub mod health_handler;
pub mod product_handler;
pub mod user_handler;

pub use health_handler::health_routes;
pub use product_handler::product_routes;
pub use user_handler::user_routes;

use common::{AppError, AppResult};

/// Parse a path id; anything that is not an id cannot name a resource.
pub(crate) fn parse_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>().map_err(|_| AppError::NotFound)
}

//! Response bodies shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use domain::{ProductResponse, UserResponse};

/// Page-number pagination envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(PaginatedUsers = Paginated<UserResponse>, PaginatedProducts = Paginated<ProductResponse>)]
pub struct Paginated<T> {
    /// Total number of rows across all pages
    pub count: u64,
    /// Absolute URL of the next page
    pub next: Option<String>,
    /// Absolute URL of the previous page
    pub previous: Option<String>,
    pub results: Vec<T>,
}

//! Product listing shape and its response form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product row joined with its category name, optionally annotated with the
/// number of products in that category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub category_name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub category_product_count: Option<i64>,
}

/// Product response, category flattened to its name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    /// Category name
    pub category: String,
    /// Decimal string with two fractional digits
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "1299.99"))]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    /// Total products in the category, only on views that compute it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_product_count: Option<i64>,
}

impl From<ProductListing> for ProductResponse {
    fn from(listing: ProductListing) -> Self {
        let mut price = listing.price;
        price.rescale(2);

        Self {
            id: listing.id,
            name: listing.name,
            category: listing.category_name,
            price,
            created_at: listing.created_at,
            category_product_count: listing.category_product_count,
        }
    }
}

//! Product handlers (read-only catalog views).

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::ProductResponse;

use super::parse_id;
use crate::extractors::Pagination;
use crate::response::{Paginated, PaginatedProducts};
use crate::state::AppState;

type ProductPage = Json<Paginated<ProductResponse>>;

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(list_products))
        .route(
            "/products/top_most_expensive_by_category/",
            get(top_most_expensive_by_category),
        )
        .route("/products/top_10_most_expensive/", get(top_10_most_expensive))
        .route(
            "/products/products_with_category_counts/",
            get(products_with_category_counts),
        )
        .route("/products/:id/", get(get_product))
}

/// List products ordered by ID
#[utoipa::path(
    get,
    path = "/api/v1/task1/products/",
    tag = "Products",
    params(
        ("page" = Option<String>, Query, description = "Page number or `last`"),
        ("page_size" = Option<u64>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "One page of products", body = PaginatedProducts),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    pagination: Pagination,
) -> AppResult<ProductPage> {
    let page = state.catalog.list_products(pagination.request()?).await?;
    Ok(Json(pagination.envelope(page)))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/api/v1/task1/products/{id}/",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with its category name", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.catalog.get_product(parse_id(&id)?).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Ten most expensive products of each category, with category counts
#[utoipa::path(
    get,
    path = "/api/v1/task1/products/top_most_expensive_by_category/",
    tag = "Products",
    params(
        ("page" = Option<String>, Query, description = "Page number or `last`"),
        ("page_size" = Option<u64>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "Ranked products ordered by ID", body = PaginatedProducts),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn top_most_expensive_by_category(
    State(state): State<AppState>,
    pagination: Pagination,
) -> AppResult<ProductPage> {
    let page = state.catalog.top_per_category(pagination.request()?).await?;
    Ok(Json(pagination.envelope(page)))
}

/// Ten most expensive products of each category, grouped by category name
#[utoipa::path(
    get,
    path = "/api/v1/task1/products/top_10_most_expensive/",
    tag = "Products",
    params(
        ("page" = Option<String>, Query, description = "Page number or `last`"),
        ("page_size" = Option<u64>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "Ranked products by category name, then price", body = PaginatedProducts),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn top_10_most_expensive(
    State(state): State<AppState>,
    pagination: Pagination,
) -> AppResult<ProductPage> {
    let page = state
        .catalog
        .top_by_category_name(pagination.request()?)
        .await?;
    Ok(Json(pagination.envelope(page)))
}

/// Every product with the size of its category
#[utoipa::path(
    get,
    path = "/api/v1/task1/products/products_with_category_counts/",
    tag = "Products",
    params(
        ("page" = Option<String>, Query, description = "Page number or `last`"),
        ("page_size" = Option<u64>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "Products by price, most expensive first", body = PaginatedProducts),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn products_with_category_counts(
    State(state): State<AppState>,
    pagination: Pagination,
) -> AppResult<ProductPage> {
    let page = state
        .catalog
        .with_category_counts(pagination.request()?)
        .await?;
    Ok(Json(pagination.envelope(page)))
}

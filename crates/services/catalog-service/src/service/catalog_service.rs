//! Catalog service - Read-only product queries.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use common::{AppResult, OptionExt, Page, PageRequest};
use domain::{ProductListing, TOP_PRODUCTS_PER_CATEGORY};

use crate::repository::{ProductRepository, RankedView};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalog service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// All products ordered by ID
    async fn list_products(&self, page: PageRequest) -> AppResult<Page<ProductListing>>;

    /// Get product by ID
    async fn get_product(&self, id: i32) -> AppResult<ProductListing>;

    /// Most expensive products of each category with category counts, by ID
    async fn top_per_category(&self, page: PageRequest) -> AppResult<Page<ProductListing>>;

    /// Most expensive products of each category, grouped by category name
    async fn top_by_category_name(&self, page: PageRequest) -> AppResult<Page<ProductListing>>;

    /// Every product with its category count, most expensive first
    async fn with_category_counts(&self, page: PageRequest) -> AppResult<Page<ProductListing>>;
}

/// Concrete implementation of CatalogService.
pub struct CatalogManager {
    products: Arc<dyn ProductRepository>,
    top_n: u32,
}

impl CatalogManager {
    /// Create new catalog service instance
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self {
            products,
            top_n: TOP_PRODUCTS_PER_CATEGORY,
        }
    }

    /// Override how many products per category the top views return
    pub fn with_top_n(mut self, top_n: u32) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    async fn ranked(&self, view: RankedView, page: PageRequest) -> AppResult<Page<ProductListing>> {
        debug!(?view, page = ?page.number, size = page.size, "Listing ranked products");
        self.products.list_ranked(view, page).await
    }
}

#[async_trait]
impl CatalogService for CatalogManager {
    async fn list_products(&self, page: PageRequest) -> AppResult<Page<ProductListing>> {
        debug!(page = ?page.number, size = page.size, "Listing products");
        self.products.list(page).await
    }

    async fn get_product(&self, id: i32) -> AppResult<ProductListing> {
        self.products.find_by_id(id).await?.ok_or_not_found()
    }

    async fn top_per_category(&self, page: PageRequest) -> AppResult<Page<ProductListing>> {
        self.ranked(RankedView::TopPerCategory { limit: self.top_n }, page)
            .await
    }

    async fn top_by_category_name(&self, page: PageRequest) -> AppResult<Page<ProductListing>> {
        self.ranked(RankedView::TopByCategoryName { limit: self.top_n }, page)
            .await
    }

    async fn with_category_counts(&self, page: PageRequest) -> AppResult<Page<ProductListing>> {
        self.ranked(RankedView::WithCategoryCounts, page).await
    }
}

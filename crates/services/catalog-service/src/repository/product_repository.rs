//! Product repository implementation (read-only).

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    prelude::DateTimeUtc, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryOrder,
};

use super::entities::category::{self, Entity as CategoryEntity};
use super::entities::product::{self, Entity as ProductEntity};
use super::ranking::RankedView;
use common::{AppError, AppResult, Page, PageRequest};
use domain::ProductListing;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product (with category name) by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ProductListing>>;

    /// One page of all products ordered by ID
    async fn list(&self, page: PageRequest) -> AppResult<Page<ProductListing>>;

    /// One page of a ranked view
    async fn list_ranked(
        &self,
        view: RankedView,
        page: PageRequest,
    ) -> AppResult<Page<ProductListing>>;
}

/// Row shape produced by the ranked statements
#[derive(Debug, FromQueryResult)]
struct RankedRow {
    id: i32,
    name: String,
    category_id: i32,
    category_name: String,
    price: Decimal,
    created_at: DateTimeUtc,
    category_product_count: Option<i64>,
}

impl RankedRow {
    fn into_listing(self, keep_count: bool) -> ProductListing {
        ProductListing {
            id: self.id,
            name: self.name,
            category_id: self.category_id,
            category_name: self.category_name,
            price: self.price,
            created_at: self.created_at,
            category_product_count: self.category_product_count.filter(|_| keep_count),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ItemCount {
    num_items: i64,
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn join_category(
    product: product::Model,
    category: Option<category::Model>,
) -> AppResult<ProductListing> {
    let id = product.id;
    category
        .map(|category| product.into_listing(category))
        .ok_or_else(|| AppError::internal(format!("product {} has no category row", id)))
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ProductListing>> {
        let row = ProductEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await?;

        row.map(|(product, category)| join_category(product, category))
            .transpose()
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<ProductListing>> {
        let paginator = ProductEntity::find()
            .find_also_related(CategoryEntity)
            .order_by_asc(product::Column::Id)
            .paginate(&self.db, page.size.max(1));

        let window = page.resolve(paginator.num_items().await?)?;
        let listings = paginator
            .fetch_page(window.index())
            .await?
            .into_iter()
            .map(|(product, category)| join_category(product, category))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(listings, window))
    }

    async fn list_ranked(
        &self,
        view: RankedView,
        page: PageRequest,
    ) -> AppResult<Page<ProductListing>> {
        let backend = self.db.get_database_backend();

        let total = ItemCount::find_by_statement(backend.build(&view.count_statement()))
            .one(&self.db)
            .await?
            .map_or(0, |count| count.num_items.max(0) as u64);
        let window = page.resolve(total)?;

        let stmt = view.page_statement(window.limit(), window.offset());
        let keep_count = view.annotates_count();
        let listings = RankedRow::find_by_statement(backend.build(&stmt))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.into_listing(keep_count))
            .collect();

        Ok(Page::new(listings, window))
    }
}

//! Catalog query tests against an in-memory SQLite database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};

use catalog_service_lib::repository::entities::{category, product};
use catalog_service_lib::seed::{self, insert_category, insert_product};
use catalog_service_lib::{catalog_service, CatalogService, Migrator};
use common::{AppError, Database, DatabaseConfig, PageNumber, PageRequest};
use domain::ProductListing;

/// Categories inserted out of name order
const CATEGORIES: [&str; 3] = ["Garden", "Books", "Audio"];
const PER_CATEGORY: i64 = 15;

// =============================================================================
// Helpers
// =============================================================================

async fn connect() -> DatabaseConnection {
    let db = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("connect");
    db.run_migrations::<Migrator>().await.expect("migrate");
    db.get_connection()
}

/// Three categories of fifteen products priced 100.00, 110.00, ... 240.00,
/// inserted cheapest first.
async fn setup() -> (std::sync::Arc<dyn CatalogService>, DatabaseConnection) {
    let conn = connect().await;

    let mut n = 0;
    for name in CATEGORIES {
        let category_id = insert_category(&conn, name, "").await.unwrap();
        for i in 0..PER_CATEGORY {
            let price = Decimal::new(100 + i * 10, 0);
            insert_product(&conn, &format!("Product {}", n), category_id, price)
                .await
                .unwrap();
            n += 1;
        }
    }

    (catalog_service(conn.clone()), conn)
}

fn page(number: u64, size: u64) -> PageRequest {
    PageRequest::new(number, size)
}

async fn collect_all<F, Fut>(fetch: F) -> Vec<ProductListing>
where
    F: Fn(PageRequest) -> Fut,
    Fut: std::future::Future<Output = common::AppResult<common::Page<ProductListing>>>,
{
    let mut items = Vec::new();
    let mut number = 1;
    loop {
        let result = fetch(page(number, 100)).await.unwrap();
        let has_next = result.window.has_next();
        items.extend(result.items);
        if !has_next {
            return items;
        }
        number += 1;
    }
}

// =============================================================================
// List and retrieve
// =============================================================================

#[tokio::test]
async fn test_list_products_by_id() {
    let (service, _) = setup().await;

    let result = service.list_products(PageRequest::default()).await.unwrap();

    assert_eq!(result.total(), 45);
    assert_eq!(result.window.num_pages, 5);
    assert_eq!(result.items.len(), 10);
    let ids: Vec<i32> = result.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    assert_eq!(result.items[0].category_name, "Garden");
    assert!(result.items.iter().all(|p| p.category_product_count.is_none()));
}

#[tokio::test]
async fn test_list_products_last_page() {
    let (service, _) = setup().await;

    let result = service
        .list_products(PageRequest {
            number: PageNumber::Last,
            size: 20,
        })
        .await
        .unwrap();

    assert_eq!(result.window.number, 3);
    assert_eq!(result.items.len(), 5);
    assert!(!result.window.has_next());
    assert!(result.window.has_previous());
}

#[tokio::test]
async fn test_page_out_of_range_is_invalid() {
    let (service, _) = setup().await;

    let result = service.list_products(page(6, 10)).await;
    assert!(matches!(result, Err(AppError::InvalidPage(_))));

    let result = service.with_category_counts(page(6, 10)).await;
    assert!(matches!(result, Err(AppError::InvalidPage(_))));
}

#[tokio::test]
async fn test_empty_catalog_has_one_empty_page() {
    let service = catalog_service(connect().await);

    let result = service.top_per_category(PageRequest::default()).await.unwrap();

    assert_eq!(result.total(), 0);
    assert!(result.items.is_empty());
    assert!(!result.window.has_next());
}

#[tokio::test]
async fn test_get_product() {
    let (service, _) = setup().await;

    let found = service.get_product(16).await.unwrap();
    assert_eq!(found.category_name, "Books");
    assert_eq!(found.price, Decimal::new(100, 0));

    let missing = service.get_product(999).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}

// =============================================================================
// Ranked views
// =============================================================================

#[tokio::test]
async fn test_category_counts_on_every_product() {
    let (service, _) = setup().await;

    let items = collect_all(|p| {
        let service = service.clone();
        async move { service.with_category_counts(p).await }
    })
    .await;

    assert_eq!(items.len(), 45);
    assert!(items
        .iter()
        .all(|p| p.category_product_count == Some(PER_CATEGORY)));
    assert!(items.windows(2).all(|w| w[0].price >= w[1].price));
    assert_eq!(items[0].price, Decimal::new(240, 0));
}

#[tokio::test]
async fn test_top_per_category_returns_most_expensive() {
    let (service, conn) = setup().await;

    let items = collect_all(|p| {
        let service = service.clone();
        async move { service.top_per_category(p).await }
    })
    .await;

    assert_eq!(items.len(), 30);
    assert!(items.windows(2).all(|w| w[0].id < w[1].id));
    assert!(items
        .iter()
        .all(|p| p.category_product_count == Some(PER_CATEGORY)));

    let mut per_category: HashMap<i32, Vec<Decimal>> = HashMap::new();
    for item in &items {
        per_category
            .entry(item.category_id)
            .or_default()
            .push(item.price);
    }
    assert_eq!(per_category.len(), 3);

    // Every product left out is no more expensive than any returned one
    let all = product::Entity::find().all(&conn).await.unwrap();
    for product in all {
        let returned = &per_category[&product.category_id];
        assert!(returned.len() <= 10);
        if !items.iter().any(|p| p.id == product.id) {
            assert!(returned.iter().all(|price| *price >= product.price));
        }
    }
}

#[tokio::test]
async fn test_top_by_category_name_ordering() {
    let (service, _) = setup().await;

    let items = collect_all(|p| {
        let service = service.clone();
        async move { service.top_by_category_name(p).await }
    })
    .await;

    assert_eq!(items.len(), 30);
    assert!(items.iter().all(|p| p.category_product_count.is_none()));
    assert!(items
        .windows(2)
        .all(|w| w[0].category_name <= w[1].category_name));

    let names: Vec<&str> = items
        .iter()
        .map(|p| p.category_name.as_str())
        .fold(Vec::new(), |mut acc, name| {
            if acc.last() != Some(&name) {
                acc.push(name);
            }
            acc
        });
    assert_eq!(names, ["Audio", "Books", "Garden"]);

    for pair in items.windows(2) {
        if pair[0].category_id == pair[1].category_id {
            assert!(pair[0].price >= pair[1].price);
        }
    }
    assert_eq!(items[0].price, Decimal::new(240, 0));
    assert_eq!(items[9].price, Decimal::new(150, 0));
}

#[tokio::test]
async fn test_top_per_category_breaks_price_ties_by_id() {
    let conn = connect().await;
    let category_id = insert_category(&conn, "Toys", "").await.unwrap();
    for i in 0..12 {
        insert_product(&conn, &format!("Toy {}", i), category_id, Decimal::new(5000, 2))
            .await
            .unwrap();
    }
    let service = catalog_service(conn);

    let result = service.top_per_category(page(1, 100)).await.unwrap();

    let ids: Vec<i32> = result.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    assert!(result
        .items
        .iter()
        .all(|p| p.category_product_count == Some(12)));
}

#[tokio::test]
async fn test_ranked_view_pagination() {
    let (service, _) = setup().await;

    let first = service.top_per_category(page(1, 10)).await.unwrap();
    let last = service
        .top_per_category(PageRequest {
            number: PageNumber::Last,
            size: 10,
        })
        .await
        .unwrap();

    assert_eq!(first.total(), 30);
    assert_eq!(first.window.num_pages, 3);
    assert_eq!(last.window.number, 3);
    assert_eq!(last.items.len(), 10);
    assert!(first.items.last().unwrap().id < last.items[0].id);
}

// =============================================================================
// Data generator
// =============================================================================

#[tokio::test]
async fn test_generate_sample_data() {
    let conn = connect().await;

    let summary = seed::generate(&conn, 2, 4).await.unwrap();
    assert_eq!(summary.categories, 2);
    assert_eq!(summary.products, 8);

    seed::generate(&conn, 1, 3).await.unwrap();

    let categories = category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(&conn)
        .await
        .unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Category 0", "Category 1", "Category 2"]);
    assert!(categories.iter().all(|c| c.description.ends_with('.')));

    let products = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(&conn)
        .await
        .unwrap();
    assert_eq!(products.len(), 11);
    assert_eq!(products[10].name, "Product 10");
    assert!(products
        .iter()
        .all(|p| p.price > Decimal::ZERO && p.price < Decimal::new(10_000, 0)));

    let service = catalog_service(conn.clone());
    let counts = service.with_category_counts(page(1, 100)).await.unwrap();
    assert_eq!(counts.total(), 11);
    assert_eq!(
        product::Entity::find().count(&conn).await.unwrap(),
        counts.total()
    );
}

//! HTTP API tests.
//!
//! The router is driven with `oneshot` against mocked services; only the
//! health check touches a (SQLite, in-memory) database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use mockall::predicate::eq;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_service_lib::service::MockCatalogService;
use common::{AppError, AppResult, Database, DatabaseConfig, Page, PageNumber, PageRequest};
use directory_service_lib::service::MockUserService;
use domain::{Profile, ProductListing, User, MSG_BIO_TOO_SHORT, MSG_REQUIRED};
use gateway_lib::config::GatewayConfig;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

const VALID_BIO: &str = "This is a valid bio that is definitely longer than fifty characters.";

// =============================================================================
// Helpers
// =============================================================================

async fn app_with(users: MockUserService, catalog: MockCatalogService, config: GatewayConfig) -> Router {
    let database = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("connect");
    create_router(AppState::new(
        Arc::new(users),
        Arc::new(catalog),
        database,
        config,
    ))
}

async fn users_app(users: MockUserService) -> Router {
    app_with(users, MockCatalogService::new(), GatewayConfig::default()).await
}

async fn catalog_app(catalog: MockCatalogService) -> Router {
    app_with(MockUserService::new(), catalog, GatewayConfig::default()).await
}

fn test_user(id: i32, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        profile: Some(Profile {
            website: Some("https://example.com".to_string()),
            bio: Some(VALID_BIO.to_string()),
        }),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn listing(id: i32, price: i64, count: Option<i64>) -> ProductListing {
    ProductListing {
        id,
        name: format!("Product {}", id),
        category_id: 1,
        category_name: "Books".to_string(),
        price: Decimal::new(price, 0),
        created_at: Utc::now(),
        category_product_count: count,
    }
}

/// Page of `total` listings cut the way a repository would
fn listings_page(page: PageRequest, total: u64, count: Option<i64>) -> AppResult<Page<ProductListing>> {
    let window = page.resolve(total)?;
    let start = window.offset();
    let end = (start + window.limit()).min(total);
    let items = (start..end)
        .map(|i| listing(i as i32 + 1, 100 + i as i64 * 10, count))
        .collect();
    Ok(Page::new(items, window))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "testserver")
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "testserver")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_payload() -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Smith",
        "profile": {"website": "https://alice.example", "bio": VALID_BIO}
    })
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_create_user_returns_created() {
    let mut users = MockUserService::new();
    users
        .expect_create_user()
        .withf(|data| data.username.as_deref() == Some("alice"))
        .times(1)
        .returning(|_| Ok(test_user(1, "alice")));

    let response = users_app(users)
        .await
        .oneshot(send_json(Method::POST, "/api/v1/task/users/", create_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["profile"]["bio"], VALID_BIO);
    assert!(body.get("created_at").is_none());
}

#[tokio::test]
async fn test_create_user_short_bio_is_rejected_before_service() {
    let mut users = MockUserService::new();
    users.expect_create_user().never();

    let mut payload = create_payload();
    payload["profile"]["bio"] = json!("Too short");

    let response = users_app(users)
        .await
        .oneshot(send_json(Method::POST, "/api/v1/task/users/", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["fields"]["profile"]["bio"][0], MSG_BIO_TOO_SHORT);
}

#[tokio::test]
async fn test_create_user_without_profile() {
    let mut users = MockUserService::new();
    users.expect_create_user().never();

    let mut payload = create_payload();
    payload.as_object_mut().unwrap().remove("profile");

    let response = users_app(users)
        .await
        .oneshot(send_json(Method::POST, "/api/v1/task/users/", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["fields"]["profile"][0], MSG_REQUIRED);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/task/users/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();

    let response = users_app(MockUserService::new())
        .await
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_users_is_plain_array_by_default() {
    let mut users = MockUserService::new();
    users
        .expect_list_users()
        .times(1)
        .returning(|| Ok(vec![test_user(1, "alice"), test_user(2, "bob")]));
    users.expect_list_users_page().never();

    let response = users_app(users)
        .await
        .oneshot(get("/api/v1/task/users/?page=abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[1]["username"], "bob");
}

#[tokio::test]
async fn test_list_users_paginated_when_enabled() {
    let mut users = MockUserService::new();
    users
        .expect_list_users_page()
        .withf(|page| page.number == PageNumber::Number(1) && page.size == 1)
        .times(1)
        .returning(|page| {
            let window = page.resolve(2)?;
            Ok(Page::new(vec![test_user(1, "alice")], window))
        });

    let config = GatewayConfig {
        paginate_users: true,
        ..GatewayConfig::default()
    };
    let app = app_with(users, MockCatalogService::new(), config).await;
    let response = app
        .oneshot(get("/api/v1/task/users/?page_size=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(
        body["next"],
        "http://testserver/api/v1/task/users/?page=2&page_size=1"
    );
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["results"][0]["username"], "alice");
}

#[tokio::test]
async fn test_patch_unknown_user_is_not_found() {
    let mut users = MockUserService::new();
    users
        .expect_update_user()
        .with(eq(99), mockall::predicate::always())
        .times(1)
        .returning(|_, _| Err(AppError::NotFound));

    let response = users_app(users)
        .await
        .oneshot(send_json(
            Method::PATCH,
            "/api/v1/task/users/99/",
            json!({"first_name": "Zed"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_patch_forwards_only_supplied_fields() {
    let mut users = MockUserService::new();
    users
        .expect_update_user()
        .withf(|id, changes| {
            *id == 1
                && changes.first_name.as_deref() == Some("Alicia")
                && changes.username.is_none()
                && changes.profile.as_ref().and_then(|p| p.website.as_deref()) == Some("")
        })
        .times(1)
        .returning(|id, _| Ok(test_user(id, "alice")));

    let response = users_app(users)
        .await
        .oneshot(send_json(
            Method::PATCH,
            "/api/v1/task/users/1/",
            json!({"first_name": "Alicia", "profile": {"website": ""}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_put_requires_every_field() {
    let mut users = MockUserService::new();
    users.expect_replace_user().never();

    let response = users_app(users)
        .await
        .oneshot(send_json(
            Method::PUT,
            "/api/v1/task/users/1/",
            json!({"username": "alice"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["fields"]["email"][0], MSG_REQUIRED);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let response = users_app(MockUserService::new())
        .await
        .oneshot(get("/api/v1/task/users/abc/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_returns_no_content() {
    let mut users = MockUserService::new();
    users
        .expect_delete_user()
        .with(eq(3))
        .times(1)
        .returning(|_| Ok(()));

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/task/users/3/")
        .body(Body::empty())
        .unwrap();
    let response = users_app(users).await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_list_products_envelope() {
    let mut catalog = MockCatalogService::new();
    catalog
        .expect_list_products()
        .withf(|page| page.number == PageNumber::Number(1) && page.size == 10)
        .times(1)
        .returning(|page| listings_page(page, 45, None));

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["count"], 45);
    assert_eq!(body["next"], "http://testserver/api/v1/task1/products/?page=2");
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["results"][0]["category"], "Books");
    assert_eq!(body["results"][3]["price"], "130.00");
    assert!(body["results"][0].get("category_product_count").is_none());
}

#[tokio::test]
async fn test_last_page_links_back_to_first_without_page() {
    let mut catalog = MockCatalogService::new();
    catalog
        .expect_list_products()
        .withf(|page| page.number == PageNumber::Last && page.size == 20)
        .times(1)
        .returning(|page| listings_page(page, 30, None));

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/?page=last&page_size=20"))
        .await
        .unwrap();

    let body = read_json(response).await;
    assert_eq!(body["next"], Value::Null);
    assert_eq!(
        body["previous"],
        "http://testserver/api/v1/task1/products/?page_size=20"
    );
    assert_eq!(body["results"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn test_invalid_page_is_not_found() {
    let mut catalog = MockCatalogService::new();
    catalog.expect_list_products().never();

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/?page=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_PAGE");
    assert_eq!(body["error"]["message"], "Invalid page.");
}

#[tokio::test]
async fn test_page_beyond_last_is_not_found() {
    let mut catalog = MockCatalogService::new();
    catalog
        .expect_with_category_counts()
        .times(1)
        .returning(|page| listings_page(page, 15, Some(15)));

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/products_with_category_counts/?page=3"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_top_by_category_includes_counts() {
    let mut catalog = MockCatalogService::new();
    catalog
        .expect_top_per_category()
        .times(1)
        .returning(|page| listings_page(page, 3, Some(15)));

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/top_most_expensive_by_category/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["results"][0]["category_product_count"], 15);
}

#[tokio::test]
async fn test_top_ten_route_uses_name_ordered_view() {
    let mut catalog = MockCatalogService::new();
    catalog.expect_top_per_category().never();
    catalog
        .expect_top_by_category_name()
        .times(1)
        .returning(|page| listings_page(page, 3, None));

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/top_10_most_expensive/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["count"], 3);
    assert!(body["results"][0].get("category_product_count").is_none());
}

#[tokio::test]
async fn test_get_product() {
    let mut catalog = MockCatalogService::new();
    catalog
        .expect_get_product()
        .with(eq(7))
        .times(1)
        .returning(|id| Ok(listing(id, 1299, None)));

    let response = catalog_app(catalog)
        .await
        .oneshot(get("/api/v1/task1/products/7/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["price"], "1299.00");
}

// =============================================================================
// Health and docs
// =============================================================================

#[tokio::test]
async fn test_health_reports_database() {
    let response = users_app(MockUserService::new())
        .await
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let response = users_app(MockUserService::new())
        .await
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["paths"]
        .get("/api/v1/task1/products/top_10_most_expensive/")
        .is_some());
}

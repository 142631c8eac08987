//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::response::{PaginatedProducts, PaginatedUsers};
use domain::{NewUser, Profile, ProfileInput, ProductResponse, UserChanges, UserResponse};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::replace_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::top_most_expensive_by_category,
        crate::handlers::product_handler::top_10_most_expensive,
        crate::handlers::product_handler::products_with_category_counts,
    ),
    components(
        schemas(
            NewUser,
            UserChanges,
            ProfileInput,
            Profile,
            UserResponse,
            ProductResponse,
            PaginatedUsers,
            PaginatedProducts,
        )
    ),
    tags(
        (name = "Users", description = "Users with a nested profile"),
        (name = "Products", description = "Catalog listings and ranked views"),
    )
)]
pub struct ApiDoc;

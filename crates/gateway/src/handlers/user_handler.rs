//! User handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::debug;

use common::AppResult;
use domain::{NewUser, UserChanges, UserResponse};

use super::parse_id;
use crate::extractors::{Pagination, ValidatedJson};
use crate::response::Paginated;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/:id/",
            get(get_user)
                .put(replace_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

/// List users with their profiles
#[utoipa::path(
    get,
    path = "/api/v1/task/users/",
    tag = "Users",
    params(
        ("page" = Option<String>, Query, description = "Page number or `last` (when paginated)"),
        ("page_size" = Option<u64>, Query, description = "Rows per page (when paginated)")
    ),
    responses(
        (status = 200, description = "Users ordered by ID; an envelope when PAGINATE_USERS is set", body = Vec<UserResponse>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    pagination: Pagination,
) -> AppResult<Response> {
    if !state.config.paginate_users {
        let users = state.users.list_users().await?;
        let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
        return Ok(Json(body).into_response());
    }

    let page = state.users.list_users_page(pagination.request()?).await?;
    let body: Paginated<UserResponse> = pagination.envelope(page);
    Ok(Json(body).into_response())
}

/// Create a user with its profile
#[utoipa::path(
    post,
    path = "/api/v1/task/users/",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User and profile created", body = UserResponse),
        (status = 400, description = "Validation error with per-field messages")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.users.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/v1/task/users/{id}/",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User with profile", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user(parse_id(&id)?).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Replace every user field
#[utoipa::path(
    put,
    path = "/api/v1/task/users/{id}/",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = NewUser,
    responses(
        (status = 200, description = "User replaced", body = UserResponse),
        (status = 400, description = "Validation error with per-field messages"),
        (status = 404, description = "User not found")
    )
)]
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<NewUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.replace_user(parse_id(&id)?, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the supplied user and profile fields
#[utoipa::path(
    patch,
    path = "/api/v1/task/users/{id}/",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserChanges,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error with per-field messages"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UserChanges>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id)?;
    debug!(user_id = id, "Partial user update");

    let user = state.users.update_user(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete user and its profile
#[utoipa::path(
    delete,
    path = "/api/v1/task/users/{id}/",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.users.delete_user(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! User repository implementation (read side).
//!
//! Writes go through the unit of work so that a user and its profile are
//! stored together; see `infra::unit_of_work`.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, SqlErr,
};

use super::entities::profile::Entity as ProfileEntity;
use super::entities::user::{self, Entity as UserEntity};
use common::{AppError, AppResult, Page, PageRequest};
use domain::{User, MSG_USERNAME_TAKEN};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user (with profile) by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;

    /// One page of users ordered by ID
    async fn list_page(&self, page: PageRequest) -> AppResult<Page<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        load_user(&self.db, id).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = UserEntity::find()
            .find_also_related(ProfileEntity)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user, profile)| user.into_user(profile))
            .collect())
    }

    async fn list_page(&self, page: PageRequest) -> AppResult<Page<User>> {
        let paginator = UserEntity::find()
            .find_also_related(ProfileEntity)
            .order_by_asc(user::Column::Id)
            .paginate(&self.db, page.size.max(1));

        let window = page.resolve(paginator.num_items().await?)?;
        let rows = paginator.fetch_page(window.index()).await?;

        let users = rows
            .into_iter()
            .map(|(user, profile)| user.into_user(profile))
            .collect();

        Ok(Page::new(users, window))
    }
}

/// Load a user and its profile on any connection or transaction.
pub(crate) async fn load_user<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<User>> {
    let row = UserEntity::find_by_id(id)
        .find_also_related(ProfileEntity)
        .one(conn)
        .await?;

    Ok(row.map(|(user, profile)| user.into_user(profile)))
}

/// Username is the only unique user column, so a unique violation on a
/// user write is reported against it.
pub(crate) fn map_user_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::field("username", MSG_USERNAME_TAKEN)
        }
        _ => AppError::from(err),
    }
}

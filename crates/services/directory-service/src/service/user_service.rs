//! User service - Handles user and profile use cases.
//!
//! Every write that touches both the user and its profile runs inside one
//! unit-of-work transaction.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use common::{AppResult, OptionExt, Page, PageRequest};
use domain::{NewUser, User, UserChanges};

use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user together with its profile
    async fn create_user(&self, data: NewUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// One page of users
    async fn list_users_page(&self, page: PageRequest) -> AppResult<Page<User>>;

    /// Apply the supplied fields, leaving the rest unchanged
    async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Overwrite every user field and apply the given profile fields
    async fn replace_user(&self, id: i32, data: NewUser) -> AppResult<User>;

    /// Delete user and, by cascade, its profile
    async fn delete_user(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using the unit of work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> UserService for UserManager<U> {
    async fn create_user(&self, data: NewUser) -> AppResult<User> {
        let (record, profile) = data.into_parts()?;

        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let id = users.insert_user(record).await?;
            users.insert_profile(id, profile).await?;
            users.find_by_id(id).await?.ok_or_not_found()
        })?;

        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn list_users_page(&self, page: PageRequest) -> AppResult<Page<User>> {
        self.uow.users().list_page(page).await
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            users.find_by_id(id).await?.ok_or_not_found()?;
            changes.validate()?;

            users.apply_changes(id, changes).await?;
            users.find_by_id(id).await?.ok_or_not_found()
        })?;

        debug!(user_id = id, "User updated");
        Ok(user)
    }

    async fn replace_user(&self, id: i32, data: NewUser) -> AppResult<User> {
        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            users.find_by_id(id).await?.ok_or_not_found()?;
            let (record, profile) = data.into_parts()?;

            users
                .apply_changes(id, UserChanges::replacing(record, profile))
                .await?;
            users.find_by_id(id).await?.ok_or_not_found()
        })?;

        debug!(user_id = id, "User replaced");
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| ctx.users().delete(id).await)?;

        info!(user_id = id, "User deleted");
        Ok(())
    }
}

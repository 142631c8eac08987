//! Unit of Work pattern implementation.
//!
//! A user and its profile are written through one `TransactionContext`, so
//! either every row of a request is committed or none is.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::repository::entities::profile::{self, Entity as ProfileEntity};
use crate::repository::entities::user::{self, Entity as UserEntity};
use crate::repository::{load_user, map_user_write_error, UserRepository, UserStore};
use common::{AppError, AppResult};
use domain::{ProfileInput, User, UserChanges, UserRecord};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the service level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository (reads outside any transaction)
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'a> {
        TxUserRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        let result = f(TransactionContext::new(&txn)).await;

        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
///
/// Every operation runs on the borrowed transaction.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user (with profile) by ID
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        load_user(self.txn, id).await
    }

    /// Insert the user row, returning its new ID
    pub async fn insert_user(&self, record: UserRecord) -> AppResult<i32> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            username: Set(record.username),
            email: Set(record.email),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(map_user_write_error)?;

        Ok(model.id)
    }

    /// Insert the profile row for a user
    pub async fn insert_profile(&self, user_id: i32, input: ProfileInput) -> AppResult<()> {
        let active_model = profile::ActiveModel {
            user_id: Set(user_id),
            website: Set(input.website),
            bio: Set(input.bio),
            ..Default::default()
        };

        active_model.insert(self.txn).await?;
        Ok(())
    }

    /// Write the given profile fields, creating the profile if the user has none
    pub async fn save_profile(&self, user_id: i32, input: ProfileInput) -> AppResult<()> {
        let existing = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.txn)
            .await?;

        let Some(existing) = existing else {
            return self.insert_profile(user_id, input).await;
        };

        let mut active: profile::ActiveModel = existing.into();
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }

        if active.is_changed() {
            active.update(self.txn).await?;
        }
        Ok(())
    }

    /// Write the given user columns
    pub async fn update_user(&self, id: i32, changes: &UserChanges) -> AppResult<()> {
        let user = UserEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = user.into();

        if let Some(username) = &changes.username {
            active.username = Set(username.clone());
        }
        if let Some(email) = &changes.email {
            active.email = Set(email.clone());
        }
        if let Some(first_name) = &changes.first_name {
            active.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &changes.last_name {
            active.last_name = Set(last_name.clone());
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.txn)
            .await
            .map_err(map_user_write_error)?;

        Ok(())
    }

    /// Profile first, then the user columns. A failing user write (say a
    /// taken username) aborts the transaction with the profile already staged.
    pub async fn apply_changes(&self, id: i32, changes: UserChanges) -> AppResult<()> {
        if let Some(profile) = changes.profile.clone() {
            self.save_profile(id, profile).await?;
        }
        self.update_user(id, &changes).await
    }

    /// Permanently delete the user; the profile goes with it by cascade
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(self.txn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}

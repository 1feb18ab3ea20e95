//! Account repository: durable store of accounts keyed by id, email and username.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, NewAccount};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by normalized email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find account by username (exact match)
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Insert a new account. A uniqueness conflict is reported as
    /// [`AppError::DuplicateAccount`], so concurrent registrations of the
    /// same identity yield exactly one winner.
    async fn create(&self, account: NewAccount) -> AppResult<Account>;
}

/// SeaORM-backed implementation of [`AccountRepository`]
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        AccountEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(account.username),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            role: Set(account.role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_insert_error)?;
        Account::try_from(model)
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateAccount,
        _ => AppError::from(err),
    }
}

//! PostgreSQL-backed account repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, Email, PasswordHash, Role, StoredAccount};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`AccountRepository`].
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    map_basic_pool_error(error, AccountPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountPersistenceError {
    map_basic_diesel_error(
        error,
        "account",
        AccountPersistenceError::query,
        AccountPersistenceError::connection,
    )
}

fn row_to_stored(row: UserRow) -> Result<StoredAccount, AccountPersistenceError> {
    let email = Email::parse(&row.email)
        .map_err(|err| AccountPersistenceError::query(format!("stored email invalid: {err}")))?;
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| AccountPersistenceError::query(format!("stored role invalid: {err}")))?;
    Ok(StoredAccount {
        account: Account {
            id: AccountId::from_uuid(row.id),
            email,
            role,
            created_at: row.created_at,
        },
        password_hash: PasswordHash::from_phc(row.password_hash),
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: &StoredAccount) -> Result<(), AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *account.account.id.as_uuid(),
            email: account.account.email.as_str(),
            password_hash: account.password_hash.as_phc(),
            role: account.account.role.as_str(),
            created_at: account.account.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountPersistenceError::duplicate_email(account.account.email.as_str())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_stored)
            .transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(|row| row_to_stored(row).map(|stored| stored.account))
            .transpose()
    }
}

//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Email, StoredAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The email is already bound to another account.
        DuplicateEmail { email: String } => "an account already exists for {email}",
    }
}

/// Storage for accounts and their password hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Fails with
    /// [`AccountPersistenceError::DuplicateEmail`] when the email is taken.
    async fn insert(&self, account: &StoredAccount) -> Result<(), AccountPersistenceError>;

    /// Look up an account and its hash by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError>;

    /// Look up the public view of an account.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError>;
}

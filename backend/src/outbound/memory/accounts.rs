//! Account storage held in memory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, Email, StoredAccount};

/// Accounts keyed by normalised email.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<Email, StoredAccount>>,
}

impl InMemoryAccountRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Email, StoredAccount>>, AccountPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| AccountPersistenceError::connection("account store lock poisoned"))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: &StoredAccount) -> Result<(), AccountPersistenceError> {
        let mut accounts = self.lock()?;
        let email = account.account.email.clone();
        if accounts.contains_key(&email) {
            return Err(AccountPersistenceError::duplicate_email(email.as_str()));
        }
        accounts.insert(email, account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError> {
        Ok(self.lock()?.get(email).cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .find(|stored| &stored.account.id == id)
            .map(|stored| stored.account.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHash, Role};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn stored(email: &str) -> StoredAccount {
        StoredAccount {
            account: Account {
                id: AccountId::random(),
                email: Email::parse(email).expect("valid email"),
                role: Role::User,
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("valid time"),
            },
            password_hash: PasswordHash::from_phc("$argon2id$v=19$stub"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_accounts_are_found_by_email_and_id() {
        let repo = InMemoryAccountRepository::new();
        let account = stored("ada@example.com");
        repo.insert(&account).await.expect("insert succeeds");

        let by_email = repo
            .find_by_email(&account.account.email)
            .await
            .expect("lookup succeeds")
            .expect("account present");
        assert_eq!(by_email.account, account.account);

        let by_id = repo
            .find_by_id(&account.account.id)
            .await
            .expect("lookup succeeds");
        assert_eq!(by_id, Some(account.account));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(&stored("ada@example.com"))
            .await
            .expect("first insert succeeds");

        let err = repo
            .insert(&stored(" ADA@example.com"))
            .await
            .expect_err("second insert fails");
        assert!(matches!(err, AccountPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_lookups_return_none() {
        let repo = InMemoryAccountRepository::new();
        let email = Email::parse("nobody@example.com").expect("valid email");
        assert!(repo.find_by_email(&email).await.expect("lookup").is_none());
        assert!(repo.find_by_id(&AccountId::random()).await.expect("lookup").is_none());
    }
}

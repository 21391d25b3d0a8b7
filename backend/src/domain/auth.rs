//! Registration, login and profile lookup.
//!
//! [`AccountService`] composes the credential store, the token service and
//! the account repository. Login failures are deliberately uniform: an
//! unknown email, a malformed email and a wrong password all produce the
//! same `unauthorized` error after roughly the same amount of hashing work.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::account::{Account, AccountId, AccountValidationError, Email, Role, StoredAccount};
use super::credentials::CredentialStore;
use super::ports::{AccountPersistenceError, AccountRepository};
use super::session_token::{IssuedToken, SessionTokenService};
use super::{Error, ErrorCode};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Problems with submitted credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The email failed validation.
    Email(AccountValidationError),
    /// Password was empty.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort {
        /// Required minimum.
        min: usize,
    },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated registration input.
///
/// # Examples
/// ```
/// use backend::domain::RegistrationCredentials;
///
/// let creds = RegistrationCredentials::try_from_parts("Ada@Example.com", "hunter22")
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct RegistrationCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl RegistrationCredentials {
    /// Validate raw registration input.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::parse(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Login input. Only presence is checked, so validation never hints at
/// whether an account exists.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Check both fields are present.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsValidationError::Email(
                AccountValidationError::EmptyEmail,
            ));
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email as typed, trimmed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    /// Bearer token and its expiry.
    pub token: IssuedToken,
    /// The account the token speaks for.
    pub account: Account,
}

/// Map account persistence failures onto the shared error taxonomy.
pub fn map_account_persistence_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => Error::service_unavailable(message),
        AccountPersistenceError::Query { message } => Error::internal(message),
        AccountPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

/// Account workflows.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    credentials: Arc<CredentialStore>,
    tokens: Arc<SessionTokenService>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Assemble the service from its collaborators.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        credentials: Arc<CredentialStore>,
        tokens: Arc<SessionTokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            credentials,
            tokens,
            clock,
        }
    }

    /// Create a `user` account and sign it in.
    ///
    /// Fails with `conflict` when the email is taken; no token is issued
    /// in that case.
    pub async fn register(
        &self,
        credentials: &RegistrationCredentials,
    ) -> Result<AuthenticatedSession, Error> {
        let account = self
            .create_account(credentials.email(), credentials.password(), Role::User)
            .await?;
        let token = self.tokens.issue(&account)?;
        info!(account_id = %account.id, "account registered");
        Ok(AuthenticatedSession { token, account })
    }

    /// Check credentials and sign the account in.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let stored = match Email::parse(credentials.email()) {
            Ok(email) => self
                .accounts
                .find_by_email(&email)
                .await
                .map_err(map_account_persistence_error)?,
            Err(_) => None,
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let (account, matched) = match stored {
            Some(StoredAccount {
                account,
                password_hash,
            }) => {
                let matched = self
                    .run_credential_check(move |store| store.verify(&password, &password_hash))
                    .await?;
                (Some(account), matched)
            }
            None => {
                let matched = self
                    .run_credential_check(move |store| store.verify_absent(&password))
                    .await?;
                (None, matched)
            }
        };

        match account {
            Some(account) if matched => {
                let token = self.tokens.issue(&account)?;
                info!(account_id = %account.id, "account signed in");
                Ok(AuthenticatedSession { token, account })
            }
            _ => {
                warn!("login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    /// Public view of the account behind a verified token.
    pub async fn profile(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_persistence_error)?
            .ok_or_else(|| Error::not_found("account not found"))
    }

    /// Create an account with `role` unless the email is already registered.
    ///
    /// Returns `true` when a new account was created. Used for seeding.
    pub async fn ensure_account(
        &self,
        email: &Email,
        password: &str,
        role: Role,
    ) -> Result<bool, Error> {
        match self.create_account(email, password, role).await {
            Ok(_) => Ok(true),
            Err(err) if err.code() == ErrorCode::Conflict => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn create_account(
        &self,
        email: &Email,
        password: &str,
        role: Role,
    ) -> Result<Account, Error> {
        let existing = self
            .accounts
            .find_by_email(email)
            .await
            .map_err(map_account_persistence_error)?;
        if existing.is_some() {
            return Err(map_account_persistence_error(
                AccountPersistenceError::duplicate_email(email.as_str()),
            ));
        }

        let password = Zeroizing::new(password.to_owned());
        let password_hash = self
            .run_credential_check(move |store| store.hash(&password))
            .await?
            .map_err(|err| Error::internal(err.to_string()))?;

        let account = Account {
            id: AccountId::random(),
            email: email.clone(),
            role,
            created_at: self.clock.utc(),
        };
        self.accounts
            .insert(&StoredAccount {
                account: account.clone(),
                password_hash,
            })
            .await
            .map_err(map_account_persistence_error)?;
        Ok(account)
    }

    /// Run Argon2 work off the async executor.
    async fn run_credential_check<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&CredentialStore) -> T + Send + 'static,
    {
        let store = Arc::clone(&self.credentials);
        tokio::task::spawn_blocking(move || work(&store))
            .await
            .map_err(|err| Error::internal(format!("credential check failed to complete: {err}")))
    }
}

impl fmt::Debug for AccountService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

//! Credential store: turns plaintext passwords into Argon2id PHC strings and
//! checks candidates against them.
//!
//! Verification never errors. A corrupted hash, a wrong password and an
//! unknown account all come back as `false`, and all three spend roughly the
//! same time doing so.

use std::fmt;
use std::sync::OnceLock;

use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

/// Password burnt against when there is no real hash to check.
const DUMMY_PASSWORD: &str = "catalogue-timing-equaliser";

/// Failure while producing a hash. Verification has no error path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Argon2 rejected the parameters or the input.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying library message.
        message: String,
    },
}

/// Opaque, salted password representation in PHC string format.
///
/// The value never appears in `Debug` output and is not serialisable.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string read back from storage. No validation happens here;
    /// a corrupted value simply never verifies.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string for persistence.
    #[must_use]
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Argon2id hasher and verifier.
///
/// # Examples
/// ```
/// use backend::domain::CredentialStore;
///
/// let store = CredentialStore::with_cost(8, 1).expect("valid parameters");
/// let hash = store.hash("hunter22").expect("hashing succeeds");
/// assert!(store.verify("hunter22", &hash));
/// assert!(!store.verify("hunter23", &hash));
/// ```
pub struct CredentialStore {
    argon2: Argon2<'static>,
    dummy: OnceLock<Option<PasswordHash>>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Store using the library's recommended Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            dummy: OnceLock::new(),
        }
    }

    /// Store with explicit memory (KiB) and iteration costs.
    ///
    /// Hashes remember their own parameters, so a store built with one cost
    /// still verifies hashes produced under another.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, 1, None).map_err(|err| {
            CredentialError::Hashing {
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy: OnceLock::new(),
        })
    }

    /// Hash `secret` under a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<PasswordHash, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| PasswordHash(hash.to_string()))
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })
    }

    /// Check `secret` against `hash` in constant time.
    ///
    /// Returns `false` for any mismatch, including a hash that does not
    /// parse.
    #[must_use]
    pub fn verify(&self, secret: &str, hash: &PasswordHash) -> bool {
        match password_hash::PasswordHash::new(hash.as_phc()) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => {
                self.burn(secret);
                false
            }
        }
    }

    /// Spend the cost of a verification when no account matched, then
    /// report a mismatch.
    #[must_use]
    pub fn verify_absent(&self, secret: &str) -> bool {
        self.burn(secret);
        false
    }

    fn burn(&self, secret: &str) {
        let dummy = self
            .dummy
            .get_or_init(|| self.hash(DUMMY_PASSWORD).ok())
            .as_ref()
            .and_then(|hash| password_hash::PasswordHash::new(hash.as_phc()).ok());
        if let Some(parsed) = dummy {
            let _mismatch = self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_err();
        }
    }
}

//! Stateless bearer tokens binding an account and role to a validity window.
//!
//! Tokens are HS256-signed JWTs carrying `sub`, `role`, `iat` and `exp`.
//! Expiry is checked here against the injected clock rather than by the JWT
//! library, so tests can move time. There is no revocation: a token stays
//! valid until `exp` even after the holder "logs out".

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::account::{Account, AccountId, Role};
use super::Error;

/// Minimum signing secret length in bytes.
pub const SIGNING_SECRET_MIN_LEN: usize = 32;

/// Default token lifetime.
pub const DEFAULT_TOKEN_LIFETIME: TimeDelta = TimeDelta::hours(24);

/// Why a presented token was rejected.
///
/// Callers must collapse every variant into the same "unauthenticated"
/// response. The distinction is for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The token could not be decoded or its claims are unusable.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the payload under our secret.
    #[error("token signature does not match")]
    BadSignature,
    /// The token was genuine but its lifetime has passed.
    #[error("token has expired")]
    Expired,
}

/// Symmetric key material for signing tokens. Zeroed on drop.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw key bytes. Length policy is enforced by configuration.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Fresh random secret of [`SIGNING_SECRET_MIN_LEN`] bytes.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; SIGNING_SECRET_MIN_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Raw key bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Identity asserted by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// Account the token was issued to.
    pub account_id: AccountId,
    /// Role held at issuance.
    pub role: Role,
}

/// Freshly issued token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// Encoded bearer token.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens.
///
/// Built once at startup from an immutable secret; safe to share across
/// workers.
pub struct SessionTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl SessionTokenService {
    /// Build the service from a secret, a lifetime and a clock.
    #[must_use]
    pub fn new(secret: &SigningSecret, lifetime: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
            validation,
            lifetime,
            clock,
        }
    }

    /// Configured token lifetime.
    #[must_use]
    pub const fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    /// Issue a token for `account` expiring one lifetime from now.
    pub fn issue(&self, account: &Account) -> Result<IssuedToken, Error> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.lifetime;
        let claims = Claims {
            sub: account.id.to_string(),
            role: account.role.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign session token: {err}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify `token` and return the identity it asserts.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::Malformed,
            })?;
        let claims = data.claims;

        let account_id = claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| AuthError::Malformed)?;
        let role = claims.role.parse::<Role>().map_err(|_| AuthError::Malformed)?;

        if self.clock.utc().timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(Principal { account_id, role })
    }
}

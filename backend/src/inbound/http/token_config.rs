//! Token signing configuration.
//!
//! Reads the signing key and token lifetime from the environment so they are
//! validated in one place and can be tested without touching process state.

use std::path::PathBuf;

use chrono::TimeDelta;
use mockable::{DefaultEnv, Env};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{DEFAULT_TOKEN_LIFETIME, SIGNING_SECRET_MIN_LEN, SigningSecret};

const KEY_DEFAULT_PATH: &str = "/var/run/secrets/token_signing_key";
pub(crate) const KEY_FILE_ENV: &str = "TOKEN_SIGNING_KEY_FILE";
pub(crate) const TTL_ENV: &str = "TOKEN_TTL_SECONDS";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of seconds";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key and fall back to an ephemeral one.
    Debug,
    /// Release builds require a usable key unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated token settings.
#[derive(Debug)]
pub struct TokenSettings {
    /// Key used to sign and verify bearer tokens.
    pub secret: SigningSecret,
    /// How long an issued token stays valid.
    pub lifetime: TimeDelta,
    /// Whether `secret` was generated for this process only.
    pub ephemeral: bool,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the key file failed.
    #[error("failed to read token signing key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than [`SIGNING_SECRET_MIN_LEN`].
    #[error("token signing key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::token_config::{token_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_file = tempfile::NamedTempFile::new()?;
/// std::fs::write(key_file.path(), vec![b'k'; 32])?;
/// let key_path = key_file.path().to_string_lossy().into_owned();
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "TOKEN_SIGNING_KEY_FILE" => Some(key_path.clone()),
///     "TOKEN_TTL_SECONDS" => Some("3600".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.lifetime.num_seconds(), 3600);
/// assert!(!settings.ephemeral);
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let lifetime = lifetime_from_env(env)?;
    let allow_ephemeral = allow_ephemeral_from_env(env)?;
    let (secret, ephemeral) = secret_from_env(env, mode, allow_ephemeral)?;
    Ok(TokenSettings {
        secret,
        lifetime,
        ephemeral,
    })
}

/// Build token settings from the real process environment.
///
/// # Errors
/// Returns [`TokenConfigError`] under the same conditions as
/// [`token_settings_from_env`].
pub fn token_settings_from_process_env(mode: BuildMode) -> Result<TokenSettings, TokenConfigError> {
    token_settings_from_env(&DefaultEnv::new(), mode)
}

/// Short, non-reversible fingerprint of a signing key for startup logs.
///
/// # Examples
///
/// ```rust
/// use backend::domain::SigningSecret;
/// use backend::inbound::http::token_config::secret_fingerprint;
///
/// let fp = secret_fingerprint(&SigningSecret::from_bytes(vec![1; 32]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SigningSecret) -> String {
    let digest = Sha256::digest(secret.expose());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

fn lifetime_from_env<E: Env>(env: &E) -> Result<TimeDelta, TokenConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(DEFAULT_TOKEN_LIFETIME);
    };
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|seconds| *seconds > 0)
        .and_then(TimeDelta::try_seconds)
        .ok_or(TokenConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        })
}

fn allow_ephemeral_from_env<E: Env>(env: &E) -> Result<bool, TokenConfigError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        None => Ok(false),
        Some(value) => parse_bool(&value).ok_or(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<(SigningSecret, bool), TokenConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_DEFAULT_PATH.to_owned()),
    );
    let tolerate = mode.is_debug() || allow_ephemeral;

    let failure = match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if length >= SIGNING_SECRET_MIN_LEN {
                return Ok((SigningSecret::from_bytes(bytes.to_vec()), false));
            }
            TokenConfigError::KeyTooShort {
                path,
                length,
                min_len: SIGNING_SECRET_MIN_LEN,
            }
        }
        Err(source) => TokenConfigError::KeyRead { path, source },
    };

    if tolerate {
        warn!(error = %failure, "using ephemeral token signing key; tokens will not survive a restart");
        Ok((SigningSecret::generate(), true))
    } else {
        Err(failure)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;

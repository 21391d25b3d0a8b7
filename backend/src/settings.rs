//! Server settings loaded via OrthoConfig.
//!
//! Values come from `CATALOGUE_*` environment variables, an optional config
//! file, and command-line flags, in the precedence OrthoConfig applies.
//! Token signing configuration is read separately by
//! [`crate::inbound::http::token_config`].

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Raised when the configured bind address does not parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind address '{value}': {source}")]
pub struct BindAddrError {
    value: String,
    #[source]
    source: std::net::AddrParseError,
}

/// Process-level settings for the catalogue server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOGUE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server keeps records in
    /// memory for the lifetime of the process.
    pub database_url: Option<String>,
    /// Directory that receives uploaded images.
    pub upload_dir: Option<PathBuf>,
    /// Insert the sample catalogue and admin account on startup.
    #[ortho_config(default = false)]
    pub seed: bool,
    /// Password for the seeded admin account.
    pub admin_password: Option<String>,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("upload_dir", &self.upload_dir)
            .field("seed", &self.seed)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`BindAddrError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, BindAddrError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| BindAddrError {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the upload directory, falling back to `./uploads`.
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_UPLOAD_DIR))
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the admin password when one is configured and non-blank.
    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password
            .as_deref()
            .filter(|password| !password.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "CATALOGUE_BIND_ADDR",
        "CATALOGUE_DATABASE_URL",
        "CATALOGUE_UPLOAD_DIR",
        "CATALOGUE_SEED",
        "CATALOGUE_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("catalogue-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.upload_dir(), Path::new("uploads"));
        assert!(settings.database_url().is_none());
        assert!(settings.admin_password().is_none());
        assert!(!settings.seed);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CATALOGUE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "CATALOGUE_DATABASE_URL",
                Some("postgres://localhost/catalogue".to_owned()),
            ),
            ("CATALOGUE_UPLOAD_DIR", Some("/srv/uploads".to_owned())),
            ("CATALOGUE_SEED", Some("true".to_owned())),
            ("CATALOGUE_ADMIN_PASSWORD", Some("hunter22".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9090
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/catalogue")
        );
        assert_eq!(settings.upload_dir(), Path::new("/srv/uploads"));
        assert!(settings.seed);
        assert_eq!(settings.admin_password(), Some("hunter22"));
    }

    #[rstest]
    fn blank_values_count_as_unset() {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: Some("   ".to_owned()),
            upload_dir: None,
            seed: false,
            admin_password: Some(" ".to_owned()),
        };
        assert!(settings.database_url().is_none());
        assert!(settings.admin_password().is_none());
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let settings = ServerSettings {
            bind_addr: Some("not-an-address".to_owned()),
            database_url: None,
            upload_dir: None,
            seed: false,
            admin_password: None,
        };
        let err = settings.bind_addr().expect_err("must not parse");
        assert!(err.to_string().contains("not-an-address"));
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: Some("postgres://user:pw@host/db".to_owned()),
            upload_dir: None,
            seed: true,
            admin_password: Some("hunter22".to_owned()),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(!rendered.contains("user:pw"));
    }
}

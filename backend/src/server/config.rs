//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use backend::inbound::http::token_config::TokenSettings;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) upload_dir: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin_password: Option<String>,
    pub(crate) seed: bool,
}

impl ServerConfig {
    /// Construct a configuration that keeps records in memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings, upload_dir: PathBuf) -> Self {
        Self {
            bind_addr,
            tokens,
            upload_dir,
            db_pool: None,
            admin_password: None,
            seed: false,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// When provided, accounts, cameras, ephemera and manufacturers are stored
    /// in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seed the sample catalogue on startup, creating the admin account when
    /// a password is supplied.
    #[must_use]
    pub fn with_seed(mut self, admin_password: Option<String>) -> Self {
        self.seed = true;
        self.admin_password = admin_password;
        self
    }
}

//! bb8 pool of `diesel-async` PostgreSQL connections shared by every
//! repository.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const MAX_CONNECTIONS: u32 = 10;
const MIN_IDLE: u32 = 1;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure to build the pool or to check a connection out of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("database pool could not be built: {0}")]
    Build(String),
    #[error("no database connection available: {0}")]
    Checkout(String),
}

impl PoolError {
    /// Driver message without the variant prefix.
    pub(crate) fn into_message(self) -> String {
        match self {
            Self::Build(message) | Self::Checkout(message) => message,
        }
    }
}

/// Where the catalogue database lives.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

/// Cloneable handle to the catalogue connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool with one idle connection ready.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the database cannot be reached.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        Pool::builder()
            .max_size(MAX_CONNECTIONS)
            .min_idle(Some(MIN_IDLE))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::Build(err.to_string()))
    }

    /// Borrow a connection, waiting at most five seconds.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when the wait times out or the connection fails.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::Checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::Build("bad url".to_owned()), "database pool could not be built: bad url")]
    #[case(PoolError::Checkout("timed out".to_owned()), "no database connection available: timed out")]
    fn errors_keep_the_driver_message(#[case] error: PoolError, #[case] rendered: &str) {
        assert_eq!(error.to_string(), rendered);
        assert!(rendered.ends_with(&error.into_message()));
    }
}

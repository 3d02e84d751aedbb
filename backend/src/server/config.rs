//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use zeroize::Zeroizing;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that keeps data in memory until a pool is
    /// attached.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        upload_dir: impl Into<PathBuf>,
        jwt_secret: &[u8],
        token_ttl: Duration,
    ) -> Self {
        Self {
            bind_addr,
            upload_dir: upload_dir.into(),
            jwt_secret: Zeroizing::new(jwt_secret.to_vec()),
            token_ttl,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Whether the PostgreSQL adapters are in use.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.db_pool.is_some()
    }
}

//! # Database Pool Management
//!
//! Opening the store file and handing out repositories.
//!
//! ```text
//! DbConfig::new(path) ──► Database::new(config).await ──► SqlitePool
//!   │                                 │
//!   └── DbLocation::File | Memory     └── pending migrations (unless skipped)
//! ```
//!
//! ## WAL Mode
//! WAL journaling lets the dashboard read while a checkout writes. The
//! busy timeout covers the short window where two checkouts both want
//! the write lock.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::TransactionRepository;

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A file, created on first open.
    File(PathBuf),

    /// Private in-memory database. Used by tests.
    Memory,
}

impl DbLocation {
    fn describe(&self) -> String {
        match self {
            DbLocation::File(path) => path.display().to_string(),
            DbLocation::Memory => ":memory:".to_string(),
        }
    }
}

/// Settings for opening a [`Database`].
///
/// ```rust
/// use karu_db::DbConfig;
/// use std::time::Duration;
///
/// let config = DbConfig::new("/tmp/karu.db").busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.busy_timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Pool size. A till has one cashier, so a handful is plenty.
    pub max_connections: u32,

    /// How long a command waits for a pooled connection.
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked write before failing.
    pub busy_timeout: Duration,

    /// Apply pending migrations on open.
    pub migrate: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            // each connection would otherwise see its own empty database
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
            migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Skip migrations, for tooling that manages the schema itself.
    pub fn without_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let base = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
            DbLocation::Memory => SqliteConnectOptions::new().in_memory(true),
        };

        base.journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // sale items reference their transaction
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }
}

/// Handle to the local store.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = %config.location.describe(), "Opening local store");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Safe to call again.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    /// Repository calls fail after this.
    pub async fn close(&self) {
        info!("Closing local store");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_has_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_store_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_file_and_memory_locations() {
        let file = DbConfig::new("/tmp/till.db").max_connections(2).without_migrations();
        assert_eq!(file.path(), Some(Path::new("/tmp/till.db")));
        assert_eq!(file.max_connections, 2);
        assert!(!file.migrate);

        let memory = DbConfig::in_memory();
        assert_eq!(memory.path(), None);
        assert_eq!(memory.max_connections, 1);
    }
}

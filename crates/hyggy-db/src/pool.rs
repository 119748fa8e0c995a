//! # Database Pool Management
//!
//! The [`Database`] handle owns the SQLite connection pool and hands out
//! repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Process startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() ← DATABASE_URL, pool settings                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(&config) ← never fails, connects lazily                 │
//! │       │                                                                 │
//! │       ├── URL ok ──► ┌─────────────────────────────────────────┐       │
//! │       │              │            SqlitePool                    │       │
//! │       │              │  ┌─────┐ ┌─────┐ ┌─────┐                │       │
//! │       │              │  │Conn1│ │Conn2│ │Conn3│ ...            │       │
//! │       │              │  └─────┘ └─────┘ └─────┘                │       │
//! │       │              └─────────────────────────────────────────┘       │
//! │       │                                                                 │
//! │       └── URL absent/bad ──► Unavailable: every acquire fails with     │
//! │                              StoreError::ConnectionFailure             │
//! │                                                                         │
//! │  Each repository call acquires one connection and returns it to the    │
//! │  pool when the call ends, whether it succeeded or not.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode with NORMAL synchronous, so readers do not
//! block the writer.

use hyggy_core::{
    Asset, Blog, BlogCategory, BlogSubcategory, Brand, Product, ProductCategory,
    ProductSpecification, ProductSubcategory, Review, Store, Warehouse,
};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use crate::config::DbConfig;
use crate::config::DATABASE_URL;
use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use crate::schema;

#[derive(Debug, Clone)]
enum Backend {
    Pool(SqlitePool),
    /// No usable connection string; holds the reason.
    Unavailable(Arc<str>),
}

/// Main database handle providing repository access.
///
/// Cloning is cheap and every clone shares the same pool.
///
/// ## Usage in a Route Handler
/// ```rust,ignore
/// async fn get_brand(db: &Database, id: i64) -> Reply<Brand> {
///     boundary::lookup(db.brands().get_by_id(&id).await)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Creates the database handle without touching the backend.
    ///
    /// ## What This Does
    /// 1. Parses the connection string
    /// 2. Configures SQLite:
    ///    - WAL mode and NORMAL synchronous for file databases
    ///    - Foreign keys as configured (off by default)
    ///    - Creates the database file if it doesn't exist
    /// 3. Builds a lazy pool: the first connection is opened by the first
    ///    operation
    ///
    /// A missing or unparseable `database_url` is not reported here. The
    /// handle is still returned and each operation fails with
    /// `ConnectionFailure`.
    pub fn new(config: &DbConfig) -> Self {
        let Some(url) = config.database_url.as_deref() else {
            warn!("DATABASE_URL is not set; store operations will fail");
            return Database::unavailable("DATABASE_URL is not set");
        };

        let options = match SqliteConnectOptions::from_str(url) {
            Ok(options) => options,
            Err(e) => {
                warn!(error = %e, "Invalid DATABASE_URL; store operations will fail");
                return Database::unavailable(&format!("invalid DATABASE_URL: {e}"));
            }
        };

        let mut options = options
            .foreign_keys(config.foreign_keys)
            .create_if_missing(true);

        if !config.is_in_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            // In-memory data lives exactly as long as its connection
            .max_lifetime(if config.is_in_memory() {
                None
            } else {
                Some(Duration::from_secs(30 * 60))
            })
            .connect_lazy_with(options);

        info!(
            max_connections = config.max_connections,
            foreign_keys = config.foreign_keys,
            "Database pool created"
        );

        Database {
            backend: Backend::Pool(pool),
        }
    }

    fn unavailable(reason: &str) -> Self {
        Database {
            backend: Backend::Unavailable(Arc::from(reason)),
        }
    }

    /// Reads [`DbConfig`] from the environment and creates the handle.
    ///
    /// A malformed pool setting (not the URL) falls back to the defaults.
    pub fn from_env() -> Self {
        let config = DbConfig::from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Invalid database settings, using defaults");
            match std::env::var(DATABASE_URL) {
                Ok(url) => DbConfig::new(url),
                Err(_) => DbConfig::default(),
            }
        });
        Database::new(&config)
    }

    /// Creates the handle and applies the catalog schema.
    ///
    /// Unlike [`new`](Self::new) this connects immediately, so an unusable
    /// backend surfaces as an error here.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let db = Database::open(&DbConfig::in_memory()).await?;
    /// let brands = db.brands().get_all().await?;
    /// ```
    pub async fn open(config: &DbConfig) -> StoreResult<Self> {
        let db = Database::new(config);
        schema::bootstrap(&db).await?;
        Ok(db)
    }

    /// Takes a connection from the pool.
    ///
    /// Every failure here is a [`StoreError::ConnectionFailure`], including
    /// pool timeouts.
    pub async fn acquire(&self) -> StoreResult<PoolConnection<Sqlite>> {
        match &self.backend {
            Backend::Pool(pool) => pool
                .acquire()
                .await
                .map_err(|e| StoreError::ConnectionFailure(e.to_string())),
            Backend::Unavailable(reason) => Err(StoreError::ConnectionFailure(reason.to_string())),
        }
    }

    /// Returns the connection pool, if the backend is configured.
    ///
    /// For advanced queries not covered by repositories.
    pub fn pool(&self) -> Option<&SqlitePool> {
        match &self.backend {
            Backend::Pool(pool) => Some(pool),
            Backend::Unavailable(_) => None,
        }
    }

    /// Returns the repository for any entity kind.
    pub fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.clone())
    }

    pub fn assets(&self) -> Repository<Asset> {
        self.repository()
    }

    pub fn brands(&self) -> Repository<Brand> {
        self.repository()
    }

    pub fn product_categories(&self) -> Repository<ProductCategory> {
        self.repository()
    }

    pub fn product_subcategories(&self) -> Repository<ProductSubcategory> {
        self.repository()
    }

    pub fn blog_categories(&self) -> Repository<BlogCategory> {
        self.repository()
    }

    pub fn blog_subcategories(&self) -> Repository<BlogSubcategory> {
        self.repository()
    }

    pub fn stores(&self) -> Repository<Store> {
        self.repository()
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let widget = db.products().get_by_id(&42).await?;
    /// ```
    pub fn products(&self) -> Repository<Product> {
        self.repository()
    }

    pub fn product_specifications(&self) -> Repository<ProductSpecification> {
        self.repository()
    }

    pub fn reviews(&self) -> Repository<Review> {
        self.repository()
    }

    pub fn warehouse(&self) -> Repository<Warehouse> {
        self.repository()
    }

    pub fn blogs(&self) -> Repository<Blog> {
        self.repository()
    }

    /// Closes the database connection pool.
    ///
    /// ## Note
    /// After calling close, all repository operations fail with
    /// `ConnectionFailure`.
    pub async fn close(&self) {
        if let Backend::Pool(pool) = &self.backend {
            info!("Closing database connection pool");
            pool.close().await;
        }
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        let Ok(mut conn) = self.acquire().await else {
            return false;
        };
        sqlx::query("SELECT 1").execute(&mut *conn).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert!(db.pool().is_some());
    }

    #[tokio::test]
    async fn test_absent_url_fails_every_operation() {
        let db = Database::new(&DbConfig::default());
        assert!(db.pool().is_none());
        assert!(!db.health_check().await);

        let err = db.brands().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));

        let err = db.brands().create(&Brand::new("Acme")).await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));

        let err = db.assets().delete(&"x".to_string()).await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
    }

    #[tokio::test]
    async fn test_malformed_url_fails_on_use() {
        let db = Database::new(&DbConfig::new("postgres://not-sqlite"));
        let err = db.stores().get_by_id(&1).await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
    }

    #[tokio::test]
    async fn test_unreachable_file_is_connection_failure() {
        let config = DbConfig::new("sqlite:///nonexistent-dir/sub/hyggy.db")
            .acquire_timeout(Duration::from_secs(1));
        let db = Database::new(&config);

        let err = db.products().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));

        let err = Database::open(&config).await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
    }

    #[tokio::test]
    async fn test_closed_pool_is_connection_failure() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = db.brands().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
    }

    #[tokio::test]
    async fn test_clones_share_the_pool() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let other = db.clone();

        let id = db.brands().create(&Brand::new("Shared")).await.unwrap();
        assert!(other.brands().get_by_id(&id).await.unwrap().is_some());
    }
}

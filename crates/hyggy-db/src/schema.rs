//! # Schema Bootstrap
//!
//! Applies the catalog DDL (`schema/sqlite/catalog.sql`, embedded at compile
//! time) to an empty or existing database.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  Database::open(&config)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bootstrap(&db)                                                        │
//! │       │                                                                 │
//! │       ├── acquire connection (ConnectionFailure if unreachable)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CREATE TABLE IF NOT EXISTS × 12  (one raw script, one round trip)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Existing tables and rows are left untouched                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no version table. Changing an existing table means editing the
//! script and rebuilding the database.

use tracing::info;

use crate::error::StoreResult;
use crate::pool::Database;

/// The catalog DDL.
pub const CATALOG_SCHEMA: &str = include_str!("../../../schema/sqlite/catalog.sql");

/// Tables created by [`CATALOG_SCHEMA`], in creation order.
pub const TABLES: &[&str] = &[
    "assets",
    "brands",
    "product_categories",
    "product_subcategories",
    "blog_categories",
    "blog_subcategories",
    "stores",
    "products",
    "product_specifications",
    "reviews",
    "warehouse",
    "blogs",
];

/// Creates every catalog table that does not exist yet.
///
/// Idempotent: safe to run on every startup.
pub async fn bootstrap(db: &Database) -> StoreResult<()> {
    info!("Applying catalog schema");

    let mut conn = db.acquire().await?;
    sqlx::raw_sql(CATALOG_SCHEMA).execute(&mut *conn).await?;

    info!(tables = TABLES.len(), "Catalog schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use hyggy_core::Brand;

    #[tokio::test]
    async fn test_bootstrap_creates_every_table() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(&mut *conn)
        .await
        .unwrap();

        for table in TABLES {
            assert!(names.iter().any(|n| n == table), "missing table {table}");
        }
        assert_eq!(names.len(), TABLES.len());
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let id = db.brands().create(&Brand::new("Kept")).await.unwrap();

        bootstrap(&db).await.unwrap();

        assert!(db.brands().get_by_id(&id).await.unwrap().is_some());
    }
}

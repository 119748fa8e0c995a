//! # hyggy-db: Entity Store for the Hyggy Catalog
//!
//! This crate persists the hyggy-core entities in SQLite through sqlx.
//! Twelve entity kinds share one generic repository; each kind contributes a
//! table descriptor.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hyggy Catalog Data Flow                          │
//! │                                                                         │
//! │  Route handler (GET /api/products/{id})                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     hyggy-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │   Entity     │  │   │
//! │  │   │   (pool.rs)   │    │   <E>         │    │ descriptors  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ create        │◄───│ Product      │  │   │
//! │  │   │ lazy connect  │    │ get_by_id     │    │ Brand        │  │   │
//! │  │   │ DbConfig      │    │ get_all       │    │ Blog ...     │  │   │
//! │  │   │               │    │ update/delete │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   boundary: store result ─► 200/201/204/400/404/500            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (DATABASE_URL)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Connection settings from the environment
//! - [`pool`] - Database handle and connection pool
//! - [`entity`] - The descriptor trait and row mapping helpers
//! - [`repository`] - Generic CRUD plus one descriptor per entity kind
//! - [`schema`] - Embedded catalog DDL
//! - [`boundary`] - Store results mapped to routing-layer replies
//! - [`error`] - Store error taxonomy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hyggy_db::{Database, DbConfig};
//! use hyggy_core::Brand;
//!
//! let db = Database::open(&DbConfig::from_env()?).await?;
//!
//! let id = db.brands().create(&Brand::new("Acme")).await?;
//! let acme = db.brands().get_by_id(&id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod boundary;
pub mod config;
pub mod entity;
pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig};
pub use entity::{Column, Entity, EntityKey, KeyStrategy};
pub use error::{StoreError, StoreResult};
pub use pool::Database;
pub use repository::Repository;

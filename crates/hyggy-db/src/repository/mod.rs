//! # Repository Module
//!
//! One generic [`Repository`] implements the five store operations for every
//! entity kind. Each kind only contributes an [`Entity`] descriptor (see the
//! submodules).
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository, Twelve Tables                        │
//! │                                                                         │
//! │  Routing layer                                                          │
//! │       │                                                                 │
//! │       │  db.brands().get_by_id(&7)                                     │
//! │       ▼                                                                 │
//! │  Repository<Brand>                                                     │
//! │  ├── create(&self, &entity)      → key                                 │
//! │  ├── get_by_id(&self, &key)      → Option<entity>                      │
//! │  ├── get_all(&self)              → Vec<entity>                         │
//! │  ├── update(&self, &entity)      → affected rows (0 or 1)              │
//! │  └── delete(&self, &key)         → affected rows (0 or 1)              │
//! │       │                                                                 │
//! │       │  SQL generated once per process from Brand's descriptor        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every call: acquire ─► one statement ─► release (also on error)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entity Descriptors
//!
//! - [`asset`] - Assets (caller-assigned string keys)
//! - [`taxonomy`] - Brands, product and blog categories and subcategories
//! - [`store`] - Stores
//! - [`product`] - Products and their specifications
//! - [`review`] - Reviews
//! - [`warehouse`] - Warehouse stock
//! - [`blog`] - Blog posts

pub mod asset;
pub mod blog;
pub mod product;
pub mod review;
pub mod store;
pub mod taxonomy;
pub mod warehouse;

use sqlx::sqlite::SqliteRow;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, error, warn};

use crate::entity::{ColumnMap, Entity, EntityKey, KeyStrategy, RowReader, Value};
use crate::error::{StoreError, StoreResult};
use crate::pool::Database;

// =============================================================================
// Statements
// =============================================================================

/// SQL text for one entity kind, generated from its descriptor.
#[derive(Debug)]
struct Statements {
    select_by_key: String,
    select_all: String,
    insert: String,
    update: String,
    delete: String,
}

/// Statements already generated in this process, keyed by entity type.
static STATEMENTS: OnceLock<RwLock<HashMap<TypeId, Arc<Statements>>>> = OnceLock::new();

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl Statements {
    fn for_entity<E: Entity>() -> Self {
        let table = quote(E::TABLE);
        let key = quote(E::KEY_COLUMN);
        let columns: Vec<String> = E::COLUMNS.iter().map(|c| quote(c.name)).collect();

        let select_list = std::iter::once(key.clone())
            .chain(columns.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");

        let insert_columns = match E::KEY_STRATEGY {
            KeyStrategy::StoreAssigned => columns.clone(),
            KeyStrategy::ExternallyAssigned => {
                std::iter::once(key.clone()).chain(columns.iter().cloned()).collect()
            }
        };

        let assignments = E::COLUMNS
            .iter()
            .filter(|c| c.updatable)
            .map(|c| format!("{} = ?", quote(c.name)))
            .collect::<Vec<_>>()
            .join(", ");

        Statements {
            select_by_key: format!("SELECT {select_list} FROM {table} WHERE {key} = ?"),
            select_all: format!("SELECT {select_list} FROM {table} ORDER BY {key}"),
            insert: format!(
                "INSERT INTO {table} ({}) VALUES ({}) RETURNING {key}",
                insert_columns.join(", "),
                placeholders(insert_columns.len()),
            ),
            update: format!("UPDATE {table} SET {assignments} WHERE {key} = ?"),
            delete: format!("DELETE FROM {table} WHERE {key} = ?"),
        }
    }

    /// Returns the statements for `E`, generating them on first use.
    fn cached<E: Entity>() -> Arc<Self> {
        let cache = STATEMENTS.get_or_init(Default::default);
        let id = TypeId::of::<E>();

        if let Some(sql) = cache.read().unwrap_or_else(PoisonError::into_inner).get(&id) {
            return Arc::clone(sql);
        }

        let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry(id)
                .or_insert_with(|| Arc::new(Statements::for_entity::<E>())),
        )
    }
}

/// Rejects `NULL` for non-nullable columns before any SQL is sent.
fn check_required<E: Entity>(values: &[Value<'_>], only_updatable: bool) -> StoreResult<()> {
    if values.len() != E::COLUMNS.len() {
        return Err(StoreError::DataIntegrity(format!(
            "{}: descriptor yields {} values for {} columns",
            E::NAME,
            values.len(),
            E::COLUMNS.len()
        )));
    }

    for (column, value) in E::COLUMNS.iter().zip(values) {
        if only_updatable && !column.updatable {
            continue;
        }
        if !column.nullable && value.is_null() {
            return Err(StoreError::ConstraintViolation(format!(
                "{}.{} is required",
                E::NAME,
                column.name
            )));
        }
    }

    Ok(())
}

fn map_row<E: Entity>(row: &SqliteRow, map: &ColumnMap) -> StoreResult<E> {
    E::from_row(&RowReader::new::<E>(row, map))
}

// =============================================================================
// Repository
// =============================================================================

/// Store operations for one entity kind.
///
/// ## Usage
/// ```rust,ignore
/// let brands = db.brands();
///
/// let id = brands.create(&Brand::new("Acme")).await?;
/// let brand = brands.get_by_id(&id).await?;          // Some(Brand { id, name: "Acme" })
/// let affected = brands.delete(&id).await?;          // 1
/// let affected = brands.delete(&id).await?;          // 0, not an error
/// ```
pub struct Repository<E: Entity> {
    db: Database,
    sql: Arc<Statements>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Repository {
            db: self.db.clone(),
            sql: Arc::clone(&self.sql),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &E::NAME)
            .field("table", &E::TABLE)
            .finish()
    }
}

impl<E: Entity> Repository<E> {
    /// Creates a repository bound to the given database.
    ///
    /// SQL for `E` is generated once per process and shared by every
    /// repository of that kind.
    pub fn new(db: Database) -> Self {
        Repository {
            db,
            sql: Statements::cached::<E>(),
            _entity: PhantomData,
        }
    }

    /// Inserts a new row and returns its key.
    ///
    /// ## Key Handling
    /// - Store-assigned: the entity's `id` is ignored and the generated key
    ///   is returned (read back in the same statement).
    /// - Externally assigned: the entity's key is inserted verbatim and
    ///   returned. A duplicate key is a `ConstraintViolation`.
    pub async fn create(&self, entity: &E) -> StoreResult<E::Key> {
        self.logged("create", self.try_create(entity).await)
    }

    /// Like [`create`](Self::create) but returns the entity with its key set.
    pub async fn insert(&self, mut entity: E) -> StoreResult<E> {
        let key = self.create(&entity).await?;
        entity.set_key(key);
        Ok(entity)
    }

    /// Fetches the row with the given key.
    ///
    /// ## Returns
    /// * `Ok(Some(entity))` - Row found
    /// * `Ok(None)` - No row with that key
    pub async fn get_by_id(&self, key: &E::Key) -> StoreResult<Option<E>> {
        self.logged("get_by_id", self.try_get_by_id(key).await)
    }

    /// Fetches every row, ordered by key.
    pub async fn get_all(&self) -> StoreResult<Vec<E>> {
        self.logged("get_all", self.try_get_all().await)
    }

    /// Overwrites every updatable column of the row matching the entity's key.
    ///
    /// Creation timestamps are not touched. Returns the number of affected
    /// rows: `0` means no such row.
    pub async fn update(&self, entity: &E) -> StoreResult<u64> {
        self.logged("update", self.try_update(entity).await)
    }

    /// Deletes the row with the given key. Returns `0` when it did not exist.
    ///
    /// Rows referencing it are left as they are.
    pub async fn delete(&self, key: &E::Key) -> StoreResult<u64> {
        self.logged("delete", self.try_delete(key).await)
    }

    // =========================================================================
    // Implementation
    // =========================================================================

    async fn try_create(&self, entity: &E) -> StoreResult<E::Key> {
        let values = entity.values();
        check_required::<E>(&values, false)?;

        let key = entity.key();
        let mut query = sqlx::query(&self.sql.insert);
        if E::KEY_STRATEGY == KeyStrategy::ExternallyAssigned {
            query = key.to_value().bind(query);
        }
        for value in values {
            query = value.bind(query);
        }

        let mut conn = self.db.acquire().await?;
        let row = query.fetch_one(&mut *conn).await?;

        let created = E::Key::decode(&row, 0)?
            .ok_or_else(|| StoreError::unexpected_null(E::NAME, E::KEY_COLUMN))?;

        debug!(entity = E::NAME, key = %created, "Row created");
        Ok(created)
    }

    async fn try_get_by_id(&self, key: &E::Key) -> StoreResult<Option<E>> {
        debug!(entity = E::NAME, key = %key, "Fetching row");

        let query = key.to_value().bind(sqlx::query(&self.sql.select_by_key));

        let mut conn = self.db.acquire().await?;
        let row = query.fetch_optional(&mut *conn).await?;

        match row {
            Some(row) => {
                let map = ColumnMap::resolve::<E>(&row)?;
                map_row(&row, &map).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn try_get_all(&self) -> StoreResult<Vec<E>> {
        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query(&self.sql.select_all)
            .fetch_all(&mut *conn)
            .await?;

        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        // Ordinals are resolved once and reused for the whole result set
        let map = ColumnMap::resolve::<E>(first)?;
        let entities = rows
            .iter()
            .map(|row| map_row(row, &map))
            .collect::<StoreResult<Vec<E>>>()?;

        debug!(entity = E::NAME, count = entities.len(), "Fetched all rows");
        Ok(entities)
    }

    async fn try_update(&self, entity: &E) -> StoreResult<u64> {
        let values = entity.values();
        check_required::<E>(&values, true)?;

        let key = entity.key();
        let mut query = sqlx::query(&self.sql.update);
        for (column, value) in E::COLUMNS.iter().zip(values) {
            if column.updatable {
                query = value.bind(query);
            }
        }
        query = key.to_value().bind(query);

        let mut conn = self.db.acquire().await?;
        let affected = query.execute(&mut *conn).await?.rows_affected();

        // Keys are unique, so this means the table has lost its key constraint
        if affected > 1 {
            warn!(entity = E::NAME, key = %key, affected, "Update matched more than one row");
            return Err(StoreError::DataIntegrity(format!(
                "{}: update of key {} matched {} rows",
                E::NAME,
                key,
                affected
            )));
        }

        debug!(entity = E::NAME, key = %key, affected, "Row updated");
        Ok(affected)
    }

    async fn try_delete(&self, key: &E::Key) -> StoreResult<u64> {
        let query = key.to_value().bind(sqlx::query(&self.sql.delete));

        let mut conn = self.db.acquire().await?;
        let affected = query.execute(&mut *conn).await?.rows_affected();

        debug!(entity = E::NAME, key = %key, affected, "Row deleted");
        Ok(affected)
    }

    /// Logs a failed operation and hands the result back unchanged.
    fn logged<T>(&self, operation: &'static str, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(err) = &result {
            error!(
                entity = E::NAME,
                table = E::TABLE,
                operation,
                kind = err.kind(),
                error = %err,
                "Store operation failed"
            );
        }
        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

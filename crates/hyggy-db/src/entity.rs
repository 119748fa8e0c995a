//! # Entity Descriptors
//!
//! The [`Entity`] trait describes how one domain type maps onto one table.
//! [`Repository`](crate::repository::Repository) implements the five CRUD
//! operations once against this description.
//!
//! ## What a Descriptor Declares
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  impl Entity for Store                                                 │
//! │                                                                         │
//! │  TABLE         "stores"                                                │
//! │  KEY_COLUMN    "id"            KEY_STRATEGY  StoreAssigned             │
//! │  COLUMNS       name (required) address (nullable) city (nullable)      │
//! │                                                                         │
//! │  values()   ──► [Text("Aarhus"), Text(None), Text(Some("Aarhus"))]     │
//! │                  bound positionally, NULL for None                      │
//! │                                                                         │
//! │  from_row() ◄── RowReader: typed getters by column index,              │
//! │                  ordinals resolved once per query (ColumnMap)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use hyggy_core::Money;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column as _, Decode, Row, Sqlite, Type};
use std::fmt;

use crate::error::{StoreError, StoreResult};

/// A parameterized SQLite statement under construction.
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

// =============================================================================
// Descriptor Pieces
// =============================================================================

/// Who chooses the primary key value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// The engine generates the key on insert; it is left out of the
    /// column list and read back with `RETURNING`.
    StoreAssigned,
    /// The caller supplies the key; it is inserted verbatim.
    ExternallyAssigned,
}

/// One non-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    /// Maps to `Option<T>` at the domain layer.
    pub nullable: bool,
    /// Rewritten by `update`. Creation timestamps are write-once.
    pub updatable: bool,
}

impl Column {
    pub const fn required(name: &'static str) -> Self {
        Column {
            name,
            nullable: false,
            updatable: true,
        }
    }

    pub const fn nullable(name: &'static str) -> Self {
        Column {
            name,
            nullable: true,
            updatable: true,
        }
    }

    /// Marks the column as written by `create` only.
    pub const fn write_once(self) -> Self {
        Column {
            updatable: false,
            ..self
        }
    }
}

// =============================================================================
// Bind Values
// =============================================================================

/// A column value ready to be bound to a `?` placeholder.
///
/// `None` always binds SQL `NULL`, never an empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Integer(Option<i64>),
    Text(Option<&'a str>),
    Bool(bool),
    /// Bound as exact decimal text.
    Money(Option<Money>),
    Timestamp(Option<DateTime<Utc>>),
}

impl<'a> Value<'a> {
    pub fn int(value: impl Into<i64>) -> Self {
        Value::Integer(Some(value.into()))
    }

    pub fn opt_int(value: Option<impl Into<i64>>) -> Self {
        Value::Integer(value.map(Into::into))
    }

    pub fn text(value: &'a str) -> Self {
        Value::Text(Some(value))
    }

    pub fn opt_text(value: Option<&'a str>) -> Self {
        Value::Text(value)
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Integer(v) => v.is_none(),
            Value::Text(v) => v.is_none(),
            Value::Bool(_) => false,
            Value::Money(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
        }
    }

    /// Binds this value as the next positional parameter.
    pub fn bind(self, query: SqliteQuery<'a>) -> SqliteQuery<'a> {
        match self {
            Value::Integer(v) => query.bind(v),
            Value::Text(v) => query.bind(v),
            Value::Bool(v) => query.bind(v),
            Value::Money(v) => query.bind(v.map(|m| m.to_string())),
            Value::Timestamp(v) => query.bind(v),
        }
    }
}

// =============================================================================
// Keys
// =============================================================================

/// A primary key type.
pub trait EntityKey: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn to_value(&self) -> Value<'_>;

    fn decode(row: &SqliteRow, ordinal: usize) -> Result<Option<Self>, sqlx::Error>;
}

impl EntityKey for i64 {
    fn to_value(&self) -> Value<'_> {
        Value::Integer(Some(*self))
    }

    fn decode(row: &SqliteRow, ordinal: usize) -> Result<Option<Self>, sqlx::Error> {
        row.try_get::<Option<i64>, _>(ordinal)
    }
}

impl EntityKey for String {
    fn to_value(&self) -> Value<'_> {
        Value::Text(Some(self.as_str()))
    }

    fn decode(row: &SqliteRow, ordinal: usize) -> Result<Option<Self>, sqlx::Error> {
        row.try_get::<Option<String>, _>(ordinal)
    }
}

// =============================================================================
// Entity
// =============================================================================

/// Table mapping for one entity kind.
///
/// ## Contract
/// - `values()` returns exactly one [`Value`] per entry of `COLUMNS`, in order.
/// - `from_row()` reads column `i` of `COLUMNS` through index `i` on the
///   [`RowReader`].
/// - `key()` is the entity's primary key; for store-assigned keys it is only
///   meaningful after `create`.
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    type Key: EntityKey;

    /// Name used in logs and error messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    const KEY_COLUMN: &'static str = "id";
    const KEY_STRATEGY: KeyStrategy = KeyStrategy::StoreAssigned;
    /// Non-key columns.
    const COLUMNS: &'static [Column];

    fn key(&self) -> Self::Key;

    fn set_key(&mut self, key: Self::Key);

    fn values(&self) -> Vec<Value<'_>>;

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self>;
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Result-set ordinals for an entity's key and columns.
///
/// Built from the first row of a result and reused for every following row
/// of the same query.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    key: usize,
    columns: Vec<usize>,
}

impl ColumnMap {
    pub fn resolve<E: Entity>(row: &SqliteRow) -> StoreResult<Self> {
        let ordinal = |name: &str| {
            row.try_column(name)
                .map(|column| column.ordinal())
                .map_err(|_| {
                    StoreError::DataIntegrity(format!(
                        "{}: result has no column '{}'",
                        E::NAME,
                        name
                    ))
                })
        };

        Ok(ColumnMap {
            key: ordinal(E::KEY_COLUMN)?,
            columns: E::COLUMNS
                .iter()
                .map(|column| ordinal(column.name))
                .collect::<StoreResult<_>>()?,
        })
    }
}

/// Typed, null-aware access to one row.
pub struct RowReader<'r> {
    row: &'r SqliteRow,
    map: &'r ColumnMap,
    entity: &'static str,
    key_column: &'static str,
    columns: &'static [Column],
}

impl<'r> RowReader<'r> {
    pub fn new<E: Entity>(row: &'r SqliteRow, map: &'r ColumnMap) -> Self {
        RowReader {
            row,
            map,
            entity: E::NAME,
            key_column: E::KEY_COLUMN,
            columns: E::COLUMNS,
        }
    }

    fn column_name(&self, index: usize) -> &'static str {
        self.columns.get(index).map_or("?", |column| column.name)
    }

    fn get<T>(&self, index: usize) -> StoreResult<Option<T>>
    where
        T: for<'a> Decode<'a, Sqlite> + Type<Sqlite>,
    {
        let ordinal = *self.map.columns.get(index).ok_or_else(|| {
            StoreError::DataIntegrity(format!("{}: no column at index {}", self.entity, index))
        })?;

        self.row
            .try_get::<Option<T>, _>(ordinal)
            .map_err(|e| StoreError::undecodable(self.entity, self.column_name(index), e))
    }

    fn require<T>(&self, index: usize, value: Option<T>) -> StoreResult<T> {
        value.ok_or_else(|| StoreError::unexpected_null(self.entity, self.column_name(index)))
    }

    pub fn key<K: EntityKey>(&self) -> StoreResult<K> {
        K::decode(self.row, self.map.key)
            .map_err(|e| StoreError::undecodable(self.entity, self.key_column, e))?
            .ok_or_else(|| StoreError::unexpected_null(self.entity, self.key_column))
    }

    pub fn text(&self, index: usize) -> StoreResult<String> {
        let value = self.get(index)?;
        self.require(index, value)
    }

    pub fn opt_text(&self, index: usize) -> StoreResult<Option<String>> {
        self.get(index)
    }

    /// Reads an integer into the narrowest domain type; out of range is an
    /// integrity error, never a silent wrap.
    pub fn int<T: TryFrom<i64>>(&self, index: usize) -> StoreResult<T> {
        let value = self.opt_int(index)?;
        self.require(index, value)
    }

    pub fn opt_int<T: TryFrom<i64>>(&self, index: usize) -> StoreResult<Option<T>> {
        self.get::<i64>(index)?
            .map(|raw| {
                T::try_from(raw).map_err(|_| {
                    StoreError::undecodable(
                        self.entity,
                        self.column_name(index),
                        format!("{raw} is out of range"),
                    )
                })
            })
            .transpose()
    }

    pub fn flag(&self, index: usize) -> StoreResult<bool> {
        let value = self.get(index)?;
        self.require(index, value)
    }

    pub fn money(&self, index: usize) -> StoreResult<Money> {
        let value = self.opt_money(index)?;
        self.require(index, value)
    }

    pub fn opt_money(&self, index: usize) -> StoreResult<Option<Money>> {
        self.get::<String>(index)?
            .map(|raw| {
                raw.parse::<Money>()
                    .map_err(|e| StoreError::undecodable(self.entity, self.column_name(index), e))
            })
            .transpose()
    }

    pub fn timestamp(&self, index: usize) -> StoreResult<DateTime<Utc>> {
        let value = self.get(index)?;
        self.require(index, value)
    }

    pub fn opt_timestamp(&self, index: usize) -> StoreResult<Option<DateTime<Utc>>> {
        self.get(index)
    }
}

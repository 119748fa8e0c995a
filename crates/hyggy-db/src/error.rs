//! # Store Error Types
//!
//! Error taxonomy for Entity Store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)       Row mapping (RowReader)              │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  StoreError (this module) ← categorized, original message kept         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository logs it (tracing::error!) and returns it unchanged         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  boundary::Reply::ServerError ← generic 500 for the routing layer      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Not-found is NOT an error here: `get_by_id` returns `Ok(None)` and
//! `update`/`delete` return an affected-row count of `0`.

use hyggy_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Entity Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    ///
    /// ## When This Occurs
    /// - `DATABASE_URL` is absent or cannot be parsed
    /// - Database file cannot be opened or created
    /// - Pool timed out or was closed
    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    /// The engine (or the required-column check) rejected a write.
    ///
    /// ## When This Occurs
    /// - Duplicate asset key (PRIMARY KEY / UNIQUE)
    /// - NULL for a required column
    /// - CHECK constraint (e.g. rating outside 0..=255)
    /// - Foreign key violation, when enforcement is enabled
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A row does not have the shape the entity descriptor expects.
    ///
    /// ## When This Occurs
    /// - NULL in a column the entity treats as required
    /// - Unparseable money text, unknown discount code, integer out of range
    /// - An update matched more than one row
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Any other engine failure (missing table, syntax error, ...).
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl StoreError {
    /// A required column read back as NULL.
    pub fn unexpected_null(entity: &str, column: &str) -> Self {
        StoreError::DataIntegrity(format!("{entity}.{column} is NULL but not nullable"))
    }

    /// A column value could not be turned into its domain type.
    pub fn undecodable(entity: &str, column: &str, reason: impl std::fmt::Display) -> Self {
        StoreError::DataIntegrity(format!("{entity}.{column}: {reason}"))
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::ConnectionFailure(_) => "connection_failure",
            StoreError::ConstraintViolation(_) => "constraint_violation",
            StoreError::DataIntegrity(_) => "data_integrity",
            StoreError::QueryFailed(_) => "query_failed",
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (unique/pk/not-null/check/fk) → ConstraintViolation
/// sqlx::Error::Database (anything else)               → QueryFailed
/// Io / Tls / Protocol / Pool* / Configuration         → ConnectionFailure
/// ColumnDecode / Decode / ColumnNotFound / ...        → DataIntegrity
/// Other                                               → QueryFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    StoreError::ConstraintViolation(db_err.message().to_string())
                }
                _ if is_constraint_code(db_err.code().as_deref()) => {
                    StoreError::ConstraintViolation(db_err.message().to_string())
                }
                _ => StoreError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::ConnectionFailure(err.to_string()),

            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::RowNotFound => StoreError::DataIntegrity(err.to_string()),

            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// SQLite extended result codes keep the primary code (`SQLITE_CONSTRAINT`,
/// 19) in the low byte.
fn is_constraint_code(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| c & 0xff == 19)
}

/// Domain conversion failures only arise while mapping rows.
impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        StoreError::DataIntegrity(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connection_failures() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::ConnectionFailure(_)));

        let err: StoreError = sqlx::Error::PoolClosed.into();
        assert_eq!(err.kind(), "connection_failure");
    }

    #[test]
    fn test_decode_errors_are_integrity_errors() {
        let err: StoreError = sqlx::Error::ColumnNotFound("price".to_string()).into();
        assert!(matches!(err, StoreError::DataIntegrity(_)));
    }

    #[test]
    fn test_core_errors_are_integrity_errors() {
        let err: StoreError = CoreError::UnknownDiscountType(4).into();
        assert_eq!(err.to_string(), "Data integrity error: Unknown discount type code: 4");
    }

    #[test]
    fn test_constraint_codes() {
        assert!(is_constraint_code(Some("19")));
        assert!(is_constraint_code(Some("1555"))); // PRIMARYKEY
        assert!(is_constraint_code(Some("2067"))); // UNIQUE
        assert!(!is_constraint_code(Some("1")));
        assert!(!is_constraint_code(None));
    }

    #[test]
    fn test_unexpected_null_message() {
        let err = StoreError::unexpected_null("Brand", "name");
        assert_eq!(
            err.to_string(),
            "Data integrity error: Brand.name is NULL but not nullable"
        );
    }
}

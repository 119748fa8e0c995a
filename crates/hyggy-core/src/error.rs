//! # Error Types
//!
//! Domain-specific error types for hyggy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hyggy-core errors (this file)                                         │
//! │  └── CoreError        - Value conversion failures                      │
//! │                                                                         │
//! │  hyggy-db errors (separate crate)                                      │
//! │  └── StoreError       - Connection / constraint / integrity failures   │
//! │                                                                         │
//! │  Flow: CoreError → StoreError::DataIntegrity → routing layer (500)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors raised while converting raw values into domain types.
///
/// The store turns these into `DataIntegrity` failures when the offending
/// value came from a database row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Text could not be parsed as an exact decimal.
    #[error("Invalid money amount '{value}': {reason}")]
    InvalidMoney { value: String, reason: String },

    /// Integer code does not name a known discount type.
    #[error("Unknown discount type code: {0}")]
    UnknownDiscountType(i64),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

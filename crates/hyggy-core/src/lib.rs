//! # hyggy-core: Pure Domain Types for the Hyggy Catalog
//!
//! This crate holds the catalog and content entities as plain data with zero
//! I/O dependencies. `hyggy-db` persists them; the routing layer serializes
//! them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Hyggy Catalog Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Routing layer (HTTP, external)                     │   │
//! │  │    GET /api/products/{id}, POST /api/brands, ...               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    hyggy-db (Entity Store)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hyggy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │   error   │                  │   │
//! │  │   │  Product  │  │   Money   │  │ CoreError │                  │   │
//! │  │   │  Blog ... │  │ discounts │  │           │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - The twelve entity kinds and [`DiscountType`]
//! - [`money`] - Exact decimal money (no floating point!)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use hyggy_core::{Money, Product};
//!
//! let product = Product::new("Widget", "A widget", Money::new(999, 2), 1, 1);
//! assert!(!product.is_discount);
//! assert_eq!(product.discount_type, None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use hyggy_core::Money` instead of
// `use hyggy_core::money::Money`

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use types::*;

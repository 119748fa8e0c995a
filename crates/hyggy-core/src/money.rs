//! # Money Module
//!
//! Provides the `Money` type for prices and discount amounts.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A catalog price of 9.99 stored as f64 and read back after a few        │
//! │  discount calculations drifts by fractions of a cent.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Fixed-point decimal (rust_decimal)                       │
//! │    9.99 is stored as mantissa 999, scale 2                              │
//! │    Database column holds the exact text "9.99"                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hyggy_core::money::Money;
//!
//! let price = Money::new(999, 2);          // 9.99
//! let total = price + Money::new(100, 2);  // 10.99
//! assert_eq!(total.to_string(), "10.99");
//!
//! let parsed: Money = "9.99".parse().unwrap();
//! assert_eq!(parsed, price);
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Number of fractional digits kept after discount arithmetic.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount held as an exact fixed-point decimal.
///
/// ## Design Decisions
/// - **rust_decimal**: 96-bit mantissa, no binary rounding
/// - **Scale preserved**: `2.00` stays `2.00` through a store round trip
/// - **Serialized as a string**: JSON numbers would reintroduce floats on the
///   frontend. As a newtype it serializes as the inner decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates money from a mantissa and a scale.
    ///
    /// ## Example
    /// ```rust
    /// use hyggy_core::money::Money;
    ///
    /// assert_eq!(Money::new(999, 2).to_string(), "9.99");
    /// assert_eq!(Money::new(200, 2).to_string(), "2.00");
    /// ```
    #[inline]
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Money(Decimal::new(mantissa, scale))
    }

    /// Wraps an existing decimal.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to [`MONEY_SCALE`] digits using Bankers Rounding.
    ///
    /// ## Example
    /// ```rust
    /// use hyggy_core::money::Money;
    ///
    /// assert_eq!(Money::new(10125, 3).round().to_string(), "10.12");
    /// assert_eq!(Money::new(10135, 3).round().to_string(), "10.14");
    /// ```
    pub fn round(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Applies a percentage discount (`percent` of 0..=100) and rounds.
    ///
    /// Out-of-range percentages are clamped, so a bad discount can never
    /// produce a negative or inflated price.
    ///
    /// ## Example
    /// ```rust
    /// use hyggy_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::new(1000, 2);                       // 10.00
    /// let sale = price.apply_percentage_discount(Decimal::new(25, 0));
    /// assert_eq!(sale.to_string(), "7.50");
    /// ```
    pub fn apply_percentage_discount(&self, percent: Decimal) -> Money {
        let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let off = self.0 * percent / Decimal::ONE_HUNDRED;
        Money(self.0 - off).round()
    }

    /// Subtracts `other`, stopping at zero.
    pub fn saturating_sub(&self, other: Money) -> Money {
        let result = self.0 - other.0;
        if result.is_sign_negative() {
            Money::zero()
        } else {
            Money(result)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal text, exactly what the database column holds.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim())
            .map(Money)
            .map_err(|e| CoreError::InvalidMoney {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_preserve_scale() {
        let money: Money = "2.00".parse().unwrap();
        assert_eq!(money.to_string(), "2.00");

        let money: Money = " 9.99 ".parse().unwrap();
        assert_eq!(money, Money::new(999, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "nine ninety".parse::<Money>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidMoney { .. }));
    }

    /// 0.1 + 0.2 must be exactly 0.3, the case floats get wrong.
    #[test]
    fn test_no_float_drift() {
        let sum = Money::new(1, 1) + Money::new(2, 1);
        assert_eq!(sum, Money::new(3, 1));
        assert_eq!(sum.to_string(), "0.3");
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Money::new(1000, 2);
        let b = Money::new(250, 2);

        assert_eq!((a + b).to_string(), "12.50");
        assert_eq!((a - b).to_string(), "7.50");

        a -= b;
        a += Money::new(1, 2);
        assert_eq!(a.to_string(), "7.51");
    }

    #[test]
    fn test_percentage_discount_clamps() {
        let price = Money::new(999, 2);
        assert_eq!(price.apply_percentage_discount(Decimal::ZERO), price);
        assert!(price.apply_percentage_discount(Decimal::new(150, 0)).is_zero());
        assert_eq!(
            price.apply_percentage_discount(Decimal::new(-5, 0)).to_string(),
            "9.99"
        );
    }

    #[test]
    fn test_saturating_sub() {
        let price = Money::new(500, 2);
        assert_eq!(price.saturating_sub(Money::new(200, 2)).to_string(), "3.00");
        assert!(price.saturating_sub(Money::new(900, 2)).is_zero());
        assert!(!price.saturating_sub(Money::new(900, 2)).is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(999, 2)).unwrap();
        assert_eq!(json, "\"9.99\"");

        let back: Money = serde_json::from_str("\"9.99\"").unwrap();
        assert_eq!(back, Money::new(999, 2));
    }
}

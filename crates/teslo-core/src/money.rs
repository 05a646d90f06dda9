//! # Money Module
//!
//! Provides the `Money` and `TaxRate` types for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    30 × 1.15 = 34.49999999999999   ❌ WRONG!                            │
//! │                                                                         │
//! │  A client and a server that each compute the total in floats can       │
//! │  disagree by one ULP and reject a perfectly honest order.              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer cents in, exact decimals out                     │
//! │    3000 cents → Decimal 30.00 × 1.1500 = 34.500000 (exact)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use teslo_core::money::{Money, TaxRate};
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // $21.98
//! let total = price + Money::from_cents(500);   // $15.99
//!
//! // Tax rates come from configuration as fractions
//! let rate = TaxRate::parse_fraction("0.15").unwrap();
//! assert_eq!(rate.bps(), 1500);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for differences
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price_cents ──┬──► LineItem.unit_price (captured at add-time)  │
/// │                        │                                                │
/// │                        └──► Order Validator (authoritative price)       │
/// │                                                                         │
/// │  Σ unit_price × qty ──► pricing::compute_summary ──► subtotal/tax/total │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use teslo_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use teslo_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000); // $10.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use teslo_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).checked_multiply_quantity(3), Some(Money::from_cents(3000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Converts to an exact decimal amount in major units.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use teslo_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_decimal(), Decimal::new(1099, 2));
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the storefront default)
///
/// The same rate must be configured on the storefront client and on the
/// API server; the order verification rejects totals priced at any other
/// rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Parses a tax rate written as a decimal fraction (`"0.15"` = 15%).
    ///
    /// ## Rules
    /// - Must be a decimal number
    /// - Must be at least 0 and below 1
    /// - Must not be finer than one basis point (`"0.00001"` is rejected)
    ///
    /// ## Example
    /// ```rust
    /// use teslo_core::money::TaxRate;
    ///
    /// assert_eq!(TaxRate::parse_fraction("0.0825").unwrap().bps(), 825);
    /// assert!(TaxRate::parse_fraction("1.5").is_err());
    /// assert!(TaxRate::parse_fraction("abc").is_err());
    /// ```
    pub fn parse_fraction(raw: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "tax_rate".to_string(),
            reason: reason.to_string(),
        };

        let value = Decimal::from_str(raw.trim())
            .map_err(|_| invalid("must be a decimal fraction such as 0.15"))?;

        if value < Decimal::ZERO || value >= Decimal::ONE {
            return Err(invalid("must be at least 0 and below 1"));
        }

        let bps = value * Decimal::from(10_000);
        if !bps.fract().is_zero() {
            return Err(invalid("must not be finer than one basis point"));
        }

        bps.to_u32()
            .map(TaxRate)
            .ok_or_else(|| invalid("must be at least 0 and below 1"))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact decimal fraction (1500 bps = 0.1500).
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", Decimal::new(i64::from(self.0), 2).normalize())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let big = Money::from_cents(i64::MAX / 100);

        assert_eq!(big.checked_multiply_quantity(999), None);
        assert_eq!(
            Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)),
            None
        );
        assert_eq!(
            Money::from_cents(250).checked_add(Money::from_cents(50)),
            Some(Money::from_cents(300))
        );
    }

    #[test]
    fn test_to_decimal_is_exact() {
        assert_eq!(Money::from_cents(1).to_decimal(), Decimal::new(1, 2));
        assert_eq!(Money::from_cents(3000).to_decimal(), Decimal::from(30));
    }

    #[test]
    fn test_tax_rate_parse_fraction() {
        assert_eq!(TaxRate::parse_fraction("0.15").unwrap().bps(), 1500);
        assert_eq!(TaxRate::parse_fraction(" 0 ").unwrap().bps(), 0);
        assert_eq!(TaxRate::parse_fraction("0.0825").unwrap().bps(), 825);

        assert!(TaxRate::parse_fraction("-0.1").is_err());
        assert!(TaxRate::parse_fraction("1").is_err());
        assert!(TaxRate::parse_fraction("0.00001").is_err());
        assert!(TaxRate::parse_fraction("fifteen").is_err());
    }

    #[test]
    fn test_tax_rate_decimal_and_display() {
        let rate = TaxRate::from_bps(1500);
        assert_eq!(rate.as_decimal(), Decimal::new(15, 2));
        assert_eq!(rate.to_string(), "15%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
    }
}

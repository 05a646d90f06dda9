//! # Pricing Engine
//!
//! Computes the derived totals of a cart or an order:
//!
//! ```text
//! number_of_items = Σ quantity            (not the number of lines)
//! subtotal        = Σ unit_price × quantity
//! tax             = subtotal × rate
//! total           = subtotal × (1 + rate)
//! ```
//!
//! No rounding happens here. Prices are integer cents and the rate is whole
//! basis points, so every product is an exact decimal; rounding the stored
//! total is the order verification's job.
//!
//! Line totals and sums are checked; a cart or order whose amounts leave
//! the `i64` cent range fails with [`CoreError::AmountOverflow`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::types::{LineItem, OrderItem};

/// The four derived totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub number_of_items: i64,
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub tax: Decimal,
    #[ts(as = "String")]
    pub total: Decimal,
}

impl OrderSummary {
    /// All totals zero (empty cart).
    pub fn zero() -> Self {
        OrderSummary::default()
    }

    /// Summary of cart lines at their captured prices.
    pub fn of_lines(lines: &[LineItem], rate: TaxRate) -> CoreResult<Self> {
        compute_summary(lines.iter().map(|l| (l.unit_price(), l.quantity)), rate)
    }

    /// Summary of order items at the prices the client claimed.
    pub fn of_order_items(items: &[OrderItem], rate: TaxRate) -> CoreResult<Self> {
        compute_summary(
            items
                .iter()
                .map(|i| (Money::from_cents(i.unit_price_cents), i.quantity)),
            rate,
        )
    }

    pub fn is_zero(&self) -> bool {
        self.number_of_items == 0 && self.subtotal.is_zero() && self.total.is_zero()
    }
}

/// Computes the derived totals from `(unit_price, quantity)` pairs.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use teslo_core::money::{Money, TaxRate};
/// use teslo_core::pricing::compute_summary;
///
/// let lines = [(Money::from_cents(1000), 1), (Money::from_cents(1000), 2)];
/// let summary = compute_summary(lines, TaxRate::from_bps(1500)).unwrap();
///
/// assert_eq!(summary.number_of_items, 3);
/// assert_eq!(summary.subtotal, Decimal::from(30));
/// assert_eq!(summary.total, Decimal::new(345, 1));
/// ```
pub fn compute_summary<I>(lines: I, rate: TaxRate) -> CoreResult<OrderSummary>
where
    I: IntoIterator<Item = (Money, i64)>,
{
    let mut number_of_items = 0_i64;
    let mut subtotal = Money::zero();

    for (price, qty) in lines {
        number_of_items = number_of_items
            .checked_add(qty)
            .ok_or(CoreError::AmountOverflow)?;
        subtotal = price
            .checked_multiply_quantity(qty)
            .and_then(|line| subtotal.checked_add(line))
            .ok_or(CoreError::AmountOverflow)?;
    }

    let subtotal = subtotal.to_decimal();
    let rate = rate.as_decimal();

    // |subtotal| < 2^63 cents and rate < 1, so the products stay far inside
    // Decimal's 96-bit range.
    Ok(OrderSummary {
        number_of_items,
        subtotal: subtotal.normalize(),
        tax: (subtotal * rate).normalize(),
        total: (subtotal * (Decimal::ONE + rate)).normalize(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> TaxRate {
        TaxRate::from_bps(1500)
    }

    #[test]
    fn test_empty_is_zero() {
        let summary = compute_summary(Vec::<(Money, i64)>::new(), rate()).unwrap();
        assert!(summary.is_zero());
        assert_eq!(summary, OrderSummary::zero());
    }

    #[test]
    fn test_count_is_sum_of_quantities() {
        let summary = compute_summary(
            [(Money::from_cents(500), 2), (Money::from_cents(250), 5)],
            rate(),
        )
        .unwrap();
        assert_eq!(summary.number_of_items, 7);
        assert_eq!(summary.subtotal, Decimal::new(2250, 2));
    }

    #[test]
    fn test_thirty_dollars_at_fifteen_percent() {
        let summary = compute_summary([(Money::from_cents(1000), 3)], rate()).unwrap();
        assert_eq!(summary.subtotal, Decimal::from(30));
        assert_eq!(summary.tax, Decimal::new(45, 1));
        assert_eq!(summary.total, Decimal::new(345, 1));
    }

    #[test]
    fn test_total_equals_subtotal_plus_tax() {
        let summary = compute_summary(
            [(Money::from_cents(1999), 3), (Money::from_cents(1), 7)],
            TaxRate::from_bps(825),
        )
        .unwrap();
        assert_eq!(summary.total, summary.subtotal + summary.tax);
    }

    #[test]
    fn test_doubling_quantities_doubles_totals() {
        let lines = [(Money::from_cents(1999), 3), (Money::from_cents(4550), 1)];
        let doubled = lines.map(|(price, qty)| (price, qty * 2));

        let once = compute_summary(lines, TaxRate::from_bps(825)).unwrap();
        let twice = compute_summary(doubled, TaxRate::from_bps(825)).unwrap();

        let two = Decimal::from(2);
        assert_eq!(twice.subtotal, once.subtotal * two);
        assert_eq!(twice.tax, once.tax * two);
        assert_eq!(twice.total, once.total * two);
    }

    #[test]
    fn test_zero_rate_total_is_subtotal() {
        let summary = compute_summary([(Money::from_cents(1234), 1)], TaxRate::zero()).unwrap();
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.total, summary.subtotal);
    }

    #[test]
    fn test_overflowing_amounts_are_an_error() {
        let huge = Money::from_cents(i64::MAX / 100);

        let err = compute_summary([(huge, 999)], rate()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));

        let err = compute_summary([(huge, 60), (huge, 60)], rate()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));

        let err = compute_summary([(Money::from_cents(1), i64::MAX), (Money::zero(), 1)], rate())
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));
    }
}

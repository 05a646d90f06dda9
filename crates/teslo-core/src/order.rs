//! # Order Verification
//!
//! The trust boundary between the storefront and the order store. The
//! client sends its own totals; the server recomputes them from catalog
//! prices and refuses anything that does not match.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/orders                                                       │
//! │       │                                                                 │
//! │       ├── no identity? ───────────────► Unauthenticated (first!)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog prices for every product id (teslo-db)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_submission() ← THIS MODULE                                     │
//! │       ├── more lines than a cart? ────► CartTooLarge                   │
//! │       ├── unknown product id? ────────► ProductNotFound                │
//! │       ├── recompute with catalog prices and server tax rate            │
//! │       ├── claimed total ≠ recomputed? ► TotalMismatch                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  VerifiedOrder::into_order() → isPaid = false, total rounded to 2dp    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The comparison is exact. Both sides price with [`crate::pricing`] over
//! integer cents and basis points, so an honest client configured with the
//! server's tax rate always produces the same decimal.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, TaxRate};
use crate::pricing::{compute_summary, OrderSummary};
use crate::types::{Order, OrderItem, OrderSubmission, ShippingAddress};
use crate::validation::{validate_quantity, validate_shipping_address};
use crate::MAX_CART_ITEMS;

/// A submission whose totals have been recomputed from catalog prices.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedOrder {
    /// Items carrying the catalog unit price.
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    /// Totals recomputed from catalog prices.
    pub summary: OrderSummary,
}

/// Verifies a client submission against authoritative catalog prices.
///
/// `catalog` maps product id to its current price; ids missing from the
/// map are unknown products.
///
/// ## Example
/// ```rust
/// use std::collections::HashMap;
/// use rust_decimal::Decimal;
/// use teslo_core::money::{Money, TaxRate};
/// use teslo_core::order::verify_submission;
/// use teslo_core::types::*;
///
/// let submission = OrderSubmission {
///     order_items: vec![OrderItem {
///         product_id: "A".into(),
///         title: "Tee".into(),
///         size: Size::M,
///         quantity: 3,
///         slug: "tee".into(),
///         image: "tee.jpg".into(),
///         unit_price_cents: 1000,
///         gender: Gender::Unisex,
///     }],
///     shipping_address: ShippingAddress {
///         first_name: "Ana".into(),
///         last_name: "Ruiz".into(),
///         address: "Calle Mayor 1".into(),
///         address2: None,
///         zip_code: "28001".into(),
///         city: "Madrid".into(),
///         country: "ES".into(),
///         phone: "600000000".into(),
///     },
///     number_of_items: 3,
///     subtotal: Decimal::from(30),
///     tax: Decimal::new(45, 1),
///     total: Decimal::new(345, 1),
/// };
///
/// let catalog = HashMap::from([("A".to_string(), Money::from_cents(1000))]);
/// let verified = verify_submission(submission, &catalog, TaxRate::from_bps(1500)).unwrap();
/// assert_eq!(verified.summary.total, Decimal::new(345, 1));
/// ```
pub fn verify_submission(
    submission: OrderSubmission,
    catalog: &HashMap<String, Money>,
    rate: TaxRate,
) -> CoreResult<VerifiedOrder> {
    if submission.order_items.is_empty() {
        return Err(ValidationError::required("orderItems").into());
    }
    if submission.order_items.len() > MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }
    validate_shipping_address(&submission.shipping_address)?;

    let mut items = Vec::with_capacity(submission.order_items.len());
    for item in submission.order_items {
        validate_quantity(item.quantity)?;

        let price = catalog
            .get(&item.product_id)
            .copied()
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;

        items.push(OrderItem {
            unit_price_cents: price.cents(),
            ..item
        });
    }

    let summary = compute_summary(
        items
            .iter()
            .map(|i| (Money::from_cents(i.unit_price_cents), i.quantity)),
        rate,
    )?;

    if submission.total != summary.total {
        return Err(CoreError::TotalMismatch {
            claimed: submission.total,
            expected: summary.total,
        });
    }

    Ok(VerifiedOrder {
        items,
        shipping_address: submission.shipping_address,
        summary,
    })
}

/// Rounds an amount to cents, halves away from zero.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl VerifiedOrder {
    /// Builds the unpaid order owned by `user_id`.
    pub fn into_order(self, user_id: &str, now: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            order_items: self.items,
            shipping_address: self.shipping_address,
            payment_method: None,
            number_of_items: self.summary.number_of_items,
            subtotal: self.summary.subtotal,
            tax: self.summary.tax,
            total: round_to_cents(self.summary.total),
            is_paid: false,
            paid_at: None,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Gender, Size};

    fn rate() -> TaxRate {
        TaxRate::from_bps(1500)
    }

    fn item(id: &str, price_cents: i64, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: id.to_string(),
            title: format!("Product {}", id),
            size: Size::M,
            quantity,
            slug: id.to_lowercase(),
            image: format!("{}.jpg", id),
            unit_price_cents: price_cents,
            gender: Gender::Women,
        }
    }

    fn submission(items: Vec<OrderItem>, total: Decimal) -> OrderSubmission {
        let summary = OrderSummary::of_order_items(&items, rate()).unwrap();
        OrderSubmission {
            order_items: items,
            shipping_address: ShippingAddress {
                first_name: "Ana".to_string(),
                last_name: "Ruiz".to_string(),
                address: "Calle Mayor 1".to_string(),
                address2: Some("2B".to_string()),
                zip_code: "28001".to_string(),
                city: "Madrid".to_string(),
                country: "ES".to_string(),
                phone: "600000000".to_string(),
            },
            number_of_items: summary.number_of_items,
            subtotal: summary.subtotal,
            tax: summary.tax,
            total,
        }
    }

    fn catalog(entries: &[(&str, i64)]) -> HashMap<String, Money> {
        entries
            .iter()
            .map(|(id, cents)| (id.to_string(), Money::from_cents(*cents)))
            .collect()
    }

    #[test]
    fn test_honest_submission_is_accepted() {
        let verified = verify_submission(
            submission(vec![item("A", 1000, 3)], Decimal::new(345, 1)),
            &catalog(&[("A", 1000)]),
            rate(),
        )
        .unwrap();

        assert_eq!(verified.summary.subtotal, Decimal::from(30));
        assert_eq!(verified.summary.tax, Decimal::new(45, 1));
        assert_eq!(verified.summary.total, Decimal::new(345, 1));
    }

    #[test]
    fn test_stale_client_price_is_total_mismatch() {
        // Client priced "A" at 10, catalog says 12: 36 × 1.15 = 41.4
        let result = verify_submission(
            submission(vec![item("A", 1000, 3)], Decimal::new(345, 1)),
            &catalog(&[("A", 1200)]),
            rate(),
        );

        match result {
            Err(CoreError::TotalMismatch { claimed, expected }) => {
                assert_eq!(claimed, Decimal::new(345, 1));
                assert_eq!(expected, Decimal::new(414, 1));
            }
            other => panic!("expected TotalMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_any_nonzero_difference_is_rejected() {
        let off_by_a_cent = Decimal::new(3451, 2);
        let result = verify_submission(
            submission(vec![item("A", 1000, 3)], off_by_a_cent),
            &catalog(&[("A", 1000)]),
            rate(),
        );
        assert!(matches!(result, Err(CoreError::TotalMismatch { .. })));
    }

    #[test]
    fn test_client_unit_price_is_never_trusted() {
        // Client lowers its own unit price and total consistently.
        let result = verify_submission(
            submission(vec![item("A", 1, 3)], Decimal::new(345, 4)),
            &catalog(&[("A", 1000)]),
            rate(),
        );
        assert!(matches!(result, Err(CoreError::TotalMismatch { .. })));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let result = verify_submission(
            submission(vec![item("A", 1000, 1), item("GHOST", 500, 1)], Decimal::ZERO),
            &catalog(&[("A", 1000)]),
            rate(),
        );
        assert!(matches!(result, Err(CoreError::ProductNotFound(id)) if id == "GHOST"));
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let result = verify_submission(submission(vec![], Decimal::ZERO), &catalog(&[]), rate());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_more_lines_than_a_cart_holds_is_rejected() {
        let items: Vec<OrderItem> = (0..=MAX_CART_ITEMS)
            .map(|n| item(&format!("P{}", n), 100, 1))
            .collect();
        let catalog: HashMap<String, Money> = items
            .iter()
            .map(|i| (i.product_id.clone(), Money::from_cents(100)))
            .collect();
        let total = OrderSummary::of_order_items(&items, rate()).unwrap().total;

        let result = verify_submission(submission(items, total), &catalog, rate());
        assert!(matches!(
            result,
            Err(CoreError::CartTooLarge { max }) if max == MAX_CART_ITEMS
        ));
    }

    #[test]
    fn test_catalog_prices_that_overflow_are_rejected() {
        let huge = i64::MAX / 100;
        let order = submission(vec![item("A", 1, 999)], Decimal::ZERO);

        let result = verify_submission(order, &catalog(&[("A", huge)]), rate());
        assert!(matches!(result, Err(CoreError::AmountOverflow)));
    }

    #[test]
    fn test_into_order_is_unpaid_with_catalog_prices() {
        let verified = verify_submission(
            submission(vec![item("A", 1000, 3)], Decimal::new(345, 1)),
            &catalog(&[("A", 1000)]),
            rate(),
        )
        .unwrap();

        let order = verified.into_order("user-1", Utc::now());
        assert!(!order.is_paid);
        assert!(order.transaction_id.is_none());
        assert!(order.paid_at.is_none());
        assert_eq!(order.user_id, "user-1");
        assert_eq!(order.total, Decimal::new(3450, 2));
        assert_eq!(order.order_items[0].unit_price_cents, 1000);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(Decimal::new(11495, 3)), Decimal::new(1150, 2));
        assert_eq!(round_to_cents(Decimal::new(11494, 3)), Decimal::new(1149, 2));
        assert_eq!(round_to_cents(Decimal::new(345, 1)), Decimal::new(345, 1));
    }
}

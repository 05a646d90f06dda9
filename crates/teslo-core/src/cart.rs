//! # Cart State Machine
//!
//! The cart is a value: every transition takes the prior state and an
//! action and returns a complete new state. Nothing outside [`reduce`]
//! mutates line items or totals.
//!
//! ## Transitions
//! ```text
//! ┌────────────────────┬──────────────────────────┬───────────────────────────────┐
//! │ Action             │ Precondition             │ Effect                        │
//! ├────────────────────┼──────────────────────────┼───────────────────────────────┤
//! │ LoadFromStorage    │ not yet loaded           │ valid snapshot lines, loaded  │
//! │ AddItem            │ size chosen, qty, price  │ append or merge quantities    │
//! │ SetQuantity        │ (id, size) line exists   │ quantity replaced             │
//! │ RemoveItem         │ (id, size) line exists   │ line deleted                  │
//! │ LoadAddress        │ -                        │ address set                   │
//! │ SetAddress         │ required fields present  │ address overwritten           │
//! │ OrderComplete      │ -                        │ items cleared, totals zeroed  │
//! └────────────────────┴──────────────────────────┴───────────────────────────────┘
//! ```
//!
//! Derived totals are recomputed inside every transition that touches the
//! line items, so `state.summary == OrderSummary::of_lines(&state.items, rate)`
//! holds after every successful `reduce`.
//!
//! Side effects (storage snapshots, notifications) belong to the caller;
//! see `teslo_client::CartStore`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::TaxRate;
use crate::pricing::OrderSummary;
use crate::types::{LineItem, ShippingAddress, Size};
use crate::validation::{validate_price_cents, validate_quantity, validate_shipping_address};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// State
// =============================================================================

/// Complete cart state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// False until the persisted snapshot has been read.
    pub is_loaded: bool,
    pub items: Vec<LineItem>,
    pub summary: OrderSummary,
    pub shipping_address: Option<ShippingAddress>,
}

impl CartState {
    /// Fresh state before hydration.
    pub fn new() -> Self {
        CartState::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds the line for a (product, size) pair.
    pub fn line(&self, product_id: &str, size: Size) -> Option<&LineItem> {
        self.items.iter().find(|l| l.is_same_line(product_id, size))
    }

    fn position(&self, product_id: &str, size: Size) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|l| l.is_same_line(product_id, size))
            .ok_or_else(|| CoreError::LineItemNotFound {
                product_id: product_id.to_string(),
                size,
            })
    }

    fn with_items(&self, items: Vec<LineItem>, rate: TaxRate) -> CoreResult<CartState> {
        Ok(CartState {
            summary: OrderSummary::of_lines(&items, rate)?,
            items,
            ..self.clone()
        })
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Tagged union of cart transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Hydrate line items from the persisted snapshot.
    LoadFromStorage(Vec<LineItem>),
    AddItem(LineItem),
    SetQuantity {
        product_id: String,
        size: Size,
        quantity: i64,
    },
    RemoveItem {
        product_id: String,
        size: Size,
    },
    /// Hydrate the address from persisted fields.
    LoadAddress(ShippingAddress),
    /// Address submitted from the checkout form.
    SetAddress(ShippingAddress),
    /// The order was accepted by the server.
    OrderComplete,
}

impl CartAction {
    /// Whether the action changes the line items (and therefore the totals).
    pub fn changes_items(&self) -> bool {
        matches!(
            self,
            CartAction::LoadFromStorage(_)
                | CartAction::AddItem(_)
                | CartAction::SetQuantity { .. }
                | CartAction::RemoveItem { .. }
                | CartAction::OrderComplete
        )
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies one action to a cart state.
///
/// ## Example
/// ```rust
/// use teslo_core::cart::{reduce, CartAction, CartState};
/// use teslo_core::money::TaxRate;
/// use teslo_core::types::{Gender, LineItem, Size};
///
/// let rate = TaxRate::from_bps(1500);
/// let line = LineItem {
///     product_id: "A".into(),
///     size: Some(Size::M),
///     unit_price_cents: 1000,
///     quantity: 1,
///     title: "Tee".into(),
///     image: "tee.jpg".into(),
///     slug: "tee".into(),
///     gender: Gender::Unisex,
/// };
///
/// let state = reduce(&CartState::new(), CartAction::AddItem(line), rate).unwrap();
/// assert_eq!(state.summary.number_of_items, 1);
/// ```
///
/// ## Errors
/// The prior state is never modified; on error the caller keeps it as is.
pub fn reduce(state: &CartState, action: CartAction, rate: TaxRate) -> CoreResult<CartState> {
    match action {
        CartAction::LoadFromStorage(snapshot) => {
            if state.is_loaded {
                return Ok(state.clone());
            }

            // The snapshot is untrusted: lines the cart could never have
            // produced are dropped, merged quantities are clamped.
            let mut items: Vec<LineItem> = Vec::with_capacity(snapshot.len().min(MAX_CART_ITEMS));
            for line in snapshot {
                let Some(size) = line.size else { continue };
                if validate_quantity(line.quantity).is_err()
                    || validate_price_cents(line.unit_price_cents).is_err()
                {
                    continue;
                }
                let len = items.len();
                match items.iter_mut().find(|l| l.is_same_line(&line.product_id, size)) {
                    Some(existing) => {
                        existing.quantity = existing
                            .quantity
                            .saturating_add(line.quantity)
                            .min(MAX_ITEM_QUANTITY);
                    }
                    None if len < MAX_CART_ITEMS => items.push(line),
                    None => {}
                }
            }

            let mut next = state.with_items(items, rate)?;
            next.is_loaded = true;
            Ok(next)
        }

        CartAction::AddItem(line) => {
            let size = line.size.ok_or_else(|| ValidationError::required("size"))?;
            validate_quantity(line.quantity)?;
            validate_price_cents(line.unit_price_cents)?;

            let mut items = state.items.clone();
            match items.iter_mut().find(|l| l.is_same_line(&line.product_id, size)) {
                Some(existing) => {
                    let merged = existing.quantity + line.quantity;
                    if merged > MAX_ITEM_QUANTITY {
                        return Err(CoreError::QuantityTooLarge {
                            requested: merged,
                            max: MAX_ITEM_QUANTITY,
                        });
                    }
                    existing.quantity = merged;
                }
                None => {
                    if items.len() >= MAX_CART_ITEMS {
                        return Err(CoreError::CartTooLarge {
                            max: MAX_CART_ITEMS,
                        });
                    }
                    items.push(line);
                }
            }

            state.with_items(items, rate)
        }

        CartAction::SetQuantity {
            product_id,
            size,
            quantity,
        } => {
            validate_quantity(quantity)?;
            let index = state.position(&product_id, size)?;

            let mut items = state.items.clone();
            items[index].quantity = quantity;
            state.with_items(items, rate)
        }

        CartAction::RemoveItem { product_id, size } => {
            let index = state.position(&product_id, size)?;

            let mut items = state.items.clone();
            items.remove(index);
            state.with_items(items, rate)
        }

        CartAction::LoadAddress(address) => Ok(CartState {
            shipping_address: Some(address),
            ..state.clone()
        }),

        CartAction::SetAddress(address) => {
            validate_shipping_address(&address)?;
            Ok(CartState {
                shipping_address: Some(address),
                ..state.clone()
            })
        }

        CartAction::OrderComplete => Ok(CartState {
            items: Vec::new(),
            summary: OrderSummary::zero(),
            ..state.clone()
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use rust_decimal::Decimal;

    fn rate() -> TaxRate {
        TaxRate::from_bps(1500)
    }

    fn line(id: &str, size: Size, price_cents: i64, quantity: i64) -> LineItem {
        LineItem {
            product_id: id.to_string(),
            size: Some(size),
            unit_price_cents: price_cents,
            quantity,
            title: format!("Product {}", id),
            image: format!("{}.jpg", id),
            slug: id.to_lowercase(),
            gender: Gender::Men,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            address: "Calle Mayor 1".to_string(),
            address2: None,
            zip_code: "28001".to_string(),
            city: "Madrid".to_string(),
            country: "ES".to_string(),
            phone: "600000000".to_string(),
        }
    }

    fn apply(state: CartState, actions: Vec<CartAction>) -> CartState {
        actions
            .into_iter()
            .fold(state, |s, a| reduce(&s, a, rate()).unwrap())
    }

    #[test]
    fn test_add_same_pair_merges_quantity() {
        let state = apply(
            CartState::new(),
            vec![
                CartAction::AddItem(line("A", Size::M, 1000, 1)),
                CartAction::AddItem(line("A", Size::M, 1000, 2)),
            ],
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.summary.subtotal, Decimal::from(30));
        assert_eq!(state.summary.tax, Decimal::new(45, 1));
        assert_eq!(state.summary.total, Decimal::new(345, 1));
    }

    #[test]
    fn test_add_new_size_creates_new_line() {
        let state = apply(
            CartState::new(),
            vec![
                CartAction::AddItem(line("A", Size::M, 1000, 1)),
                CartAction::AddItem(line("A", Size::L, 1000, 1)),
            ],
        );

        assert_eq!(state.items.len(), 2);
        assert!(state.line("A", Size::M).is_some());
        assert!(state.line("A", Size::L).is_some());
    }

    #[test]
    fn test_count_is_sum_of_quantities_after_every_add() {
        let adds = [
            line("A", Size::M, 1000, 2),
            line("B", Size::S, 2500, 1),
            line("A", Size::M, 1000, 4),
            line("C", Size::XL, 999, 3),
            line("B", Size::S, 2500, 5),
        ];

        let mut state = CartState::new();
        for add in adds {
            state = reduce(&state, CartAction::AddItem(add), rate()).unwrap();
            let sum: i64 = state.items.iter().map(|l| l.quantity).sum();
            assert_eq!(state.summary.number_of_items, sum);
        }

        assert_eq!(state.items.len(), 3);
        assert_eq!(state.summary.number_of_items, 15);
    }

    #[test]
    fn test_add_without_size_is_rejected() {
        let mut sizeless = line("A", Size::M, 1000, 1);
        sizeless.size = None;

        let result = reduce(&CartState::new(), CartAction::AddItem(sizeless), rate());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_add_rejects_non_positive_and_oversized_quantities() {
        let zero = reduce(
            &CartState::new(),
            CartAction::AddItem(line("A", Size::M, 1000, 0)),
            rate(),
        );
        assert!(zero.is_err());

        let state = apply(
            CartState::new(),
            vec![CartAction::AddItem(line("A", Size::M, 1000, 990))],
        );
        let merged = reduce(&state, CartAction::AddItem(line("A", Size::M, 1000, 10)), rate());
        assert!(matches!(merged, Err(CoreError::QuantityTooLarge { requested: 1000, .. })));
    }

    #[test]
    fn test_set_quantity_replaces_outright() {
        let state = apply(
            CartState::new(),
            vec![
                CartAction::AddItem(line("A", Size::M, 1000, 3)),
                CartAction::SetQuantity {
                    product_id: "A".to_string(),
                    size: Size::M,
                    quantity: 1,
                },
            ],
        );

        assert_eq!(state.items[0].quantity, 1);
        assert_eq!(state.summary.subtotal, Decimal::from(10));
    }

    #[test]
    fn test_set_quantity_and_remove_require_existing_line() {
        let state = apply(
            CartState::new(),
            vec![CartAction::AddItem(line("A", Size::M, 1000, 1))],
        );

        let set = reduce(
            &state,
            CartAction::SetQuantity {
                product_id: "A".to_string(),
                size: Size::S,
                quantity: 2,
            },
            rate(),
        );
        assert!(matches!(set, Err(CoreError::LineItemNotFound { .. })));

        let remove = reduce(
            &state,
            CartAction::RemoveItem {
                product_id: "B".to_string(),
                size: Size::M,
            },
            rate(),
        );
        assert!(matches!(remove, Err(CoreError::LineItemNotFound { .. })));
    }

    #[test]
    fn test_remove_last_item_zeroes_totals() {
        let state = apply(
            CartState::new(),
            vec![
                CartAction::AddItem(line("A", Size::M, 1000, 2)),
                CartAction::RemoveItem {
                    product_id: "A".to_string(),
                    size: Size::M,
                },
            ],
        );

        assert!(state.is_empty());
        assert!(state.summary.is_zero());
        assert_eq!(state.summary.tax, Decimal::ZERO);
    }

    #[test]
    fn test_hydrate_marks_loaded_and_runs_once() {
        let snapshot = vec![line("A", Size::M, 1000, 2)];
        let state = reduce(
            &CartState::new(),
            CartAction::LoadFromStorage(snapshot.clone()),
            rate(),
        )
        .unwrap();

        assert!(state.is_loaded);
        assert_eq!(state.summary.number_of_items, 2);
        assert_eq!(state.summary.total, Decimal::new(23, 0));

        let again = reduce(
            &state,
            CartAction::LoadFromStorage(vec![line("Z", Size::S, 1, 1)]),
            rate(),
        )
        .unwrap();
        assert_eq!(again, state);
    }

    #[test]
    fn test_hydrate_merges_duplicate_and_drops_invalid_lines() {
        let mut sizeless = line("B", Size::M, 500, 1);
        sizeless.size = None;

        let state = reduce(
            &CartState::new(),
            CartAction::LoadFromStorage(vec![
                line("A", Size::M, 1000, 1),
                line("A", Size::M, 1000, 1),
                sizeless,
                line("C", Size::L, 700, 0),
            ]),
            rate(),
        )
        .unwrap();

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 2);
    }

    #[test]
    fn test_hydrate_keeps_snapshot_within_cart_limits() {
        let mut snapshot = vec![
            line("A", Size::M, 1000, 900),
            line("A", Size::M, 1000, 900),
            line("HUGE", Size::S, i64::MAX / 100, 999),
            line("MANY", Size::S, 100, i64::MAX),
            line("NEG", Size::S, -500, 1),
        ];
        snapshot.extend((0..MAX_CART_ITEMS).map(|n| line(&format!("P{}", n), Size::L, 100, 1)));

        let state = reduce(&CartState::new(), CartAction::LoadFromStorage(snapshot), rate())
            .unwrap();

        assert!(state.is_loaded);
        assert_eq!(state.items.len(), MAX_CART_ITEMS);
        assert_eq!(state.line("A", Size::M).unwrap().quantity, MAX_ITEM_QUANTITY);
        assert!(state.line("HUGE", Size::S).is_none());
        assert!(state.line("MANY", Size::S).is_none());
        assert!(state.line("NEG", Size::S).is_none());
        assert_eq!(
            state.summary,
            OrderSummary::of_lines(&state.items, rate()).unwrap()
        );
    }

    #[test]
    fn test_add_rejects_price_outside_catalog_range() {
        let result = reduce(
            &CartState::new(),
            CartAction::AddItem(line("A", Size::M, i64::MAX / 100, 999)),
            rate(),
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_set_address_validates_required_fields() {
        let mut incomplete = address();
        incomplete.city.clear();

        let result = reduce(&CartState::new(), CartAction::SetAddress(incomplete), rate());
        assert!(result.is_err());

        let state = reduce(&CartState::new(), CartAction::SetAddress(address()), rate()).unwrap();
        assert_eq!(state.shipping_address, Some(address()));
    }

    #[test]
    fn test_order_complete_clears_items_but_keeps_address() {
        let state = apply(
            CartState::new(),
            vec![
                CartAction::LoadFromStorage(Vec::new()),
                CartAction::LoadAddress(address()),
                CartAction::AddItem(line("A", Size::M, 1000, 1)),
                CartAction::AddItem(line("B", Size::S, 2500, 2)),
            ],
        );
        assert!(state.summary.total > Decimal::ZERO);

        let done = reduce(&state, CartAction::OrderComplete, rate()).unwrap();
        assert!(done.items.is_empty());
        assert_eq!(done.summary.number_of_items, 0);
        assert_eq!(done.summary.subtotal, Decimal::ZERO);
        assert_eq!(done.summary.tax, Decimal::ZERO);
        assert_eq!(done.summary.total, Decimal::ZERO);
        assert_eq!(done.shipping_address, Some(address()));
        assert!(done.is_loaded);
    }

    #[test]
    fn test_failed_transition_leaves_prior_state_untouched() {
        let state = apply(
            CartState::new(),
            vec![CartAction::AddItem(line("A", Size::M, 1000, 1))],
        );
        let before = state.clone();

        let _ = reduce(
            &state,
            CartAction::SetQuantity {
                product_id: "A".to_string(),
                size: Size::M,
                quantity: -4,
            },
            rate(),
        );
        assert_eq!(state, before);
    }
}

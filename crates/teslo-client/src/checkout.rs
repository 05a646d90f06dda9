//! # Order Submission Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order(store, gateway)                                           │
//! │       │                                                                 │
//! │       ├── no shipping address? ──► NoShippingAddress  (nothing sent)   │
//! │       ├── no line items?       ──► EmptyCart          (nothing sent)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderSubmission { items, address, numberOfItems, subtotal, tax, total }│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  gateway.submit_order() ── one call, no retry                          │
//! │       │                                                                 │
//! │       ├── Err ──► Rejected{code,message} / Transport; cart untouched   │
//! │       │                                                                 │
//! │       ▼ Ok(order)                                                       │
//! │  store.complete_order()   items + snapshot cleared, address kept       │
//! │  notify "Order created!"                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller disables the place-order button while a submission is in
//! flight; this module holds no lock of its own.

use tracing::{info, warn};

use teslo_core::cart::CartState;
use teslo_core::{Order, OrderItem, OrderSubmission};

use crate::error::CheckoutError;
use crate::gateway::{OrderGateway, PaymentCapture};
use crate::notify::{Notification, Notifier, ORDER_CREATED, PAYMENT_CAPTURED, PAYMENT_FAILED};
use crate::storage::KeyValueStore;
use crate::store::CartStore;

/// Builds the submission for the current cart, checking the local
/// preconditions.
pub fn build_submission(state: &CartState) -> Result<OrderSubmission, CheckoutError> {
    let shipping_address = state
        .shipping_address
        .clone()
        .ok_or(CheckoutError::NoShippingAddress)?;

    if state.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let order_items = state
        .items
        .iter()
        .map(OrderItem::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(teslo_core::CoreError::from)?;

    Ok(OrderSubmission {
        order_items,
        shipping_address,
        number_of_items: state.summary.number_of_items,
        subtotal: state.summary.subtotal,
        tax: state.summary.tax,
        total: state.summary.total,
    })
}

/// Places an order for the current cart.
pub async fn create_order<S, N, G>(
    store: &mut CartStore<S, N>,
    gateway: &G,
) -> Result<Order, CheckoutError>
where
    S: KeyValueStore,
    N: Notifier,
    G: OrderGateway + ?Sized,
{
    let submission = build_submission(store.state())?;

    let order = match gateway.submit_order(&submission).await {
        Ok(order) => order,
        Err(e) => {
            warn!(error = %e, "Order submission failed");
            return Err(e.into());
        }
    };

    info!(order_id = %order.id, total = %order.total, "Order created");

    // The order exists server-side now; a storage hiccup must not hide that.
    if let Err(e) = store.complete_order() {
        warn!(error = %e, "Cart cleared but its snapshot could not be removed");
    }
    store.notifier().notify(Notification::success(ORDER_CREATED));

    Ok(order)
}

/// Records a payment the payment widget captured for `order_id`.
///
/// A failure is shown to the shopper; the order stays unpaid.
pub async fn capture_payment<G, N>(
    gateway: &G,
    notifier: &N,
    order_id: &str,
    transaction_id: &str,
) -> Result<Order, CheckoutError>
where
    G: OrderGateway + ?Sized,
    N: Notifier + ?Sized,
{
    let capture = PaymentCapture {
        order_id: order_id.to_string(),
        transaction_id: transaction_id.to_string(),
    };

    match gateway.capture_payment(&capture).await {
        Ok(order) => {
            info!(order_id = %order.id, transaction_id = %transaction_id, "Payment captured");
            notifier.notify(Notification::success(PAYMENT_CAPTURED));
            Ok(order)
        }
        Err(e) => {
            warn!(order_id = %order_id, error = %e, "Payment capture failed");
            notifier.notify(Notification::error(PAYMENT_FAILED));
            Err(e.into())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use teslo_core::order::verify_submission;
    use teslo_core::{CoreError, Gender, LineItem, Money, ShippingAddress, Size, TaxRate};

    use crate::error::GatewayError;
    use crate::notify::{NotificationVariant, RecordingNotifier};
    use crate::storage::{keys, MemoryStore};

    /// Runs the real order verification against an in-memory catalog.
    struct FakeGateway {
        catalog: HashMap<String, Money>,
        offline: bool,
        submitted: Mutex<Vec<OrderSubmission>>,
        orders: Mutex<HashMap<String, Order>>,
    }

    impl FakeGateway {
        fn with_prices(prices: &[(&str, i64)]) -> Self {
            FakeGateway {
                catalog: prices
                    .iter()
                    .map(|(id, cents)| (id.to_string(), Money::from_cents(*cents)))
                    .collect(),
                offline: false,
                submitted: Mutex::new(Vec::new()),
                orders: Mutex::new(HashMap::new()),
            }
        }

        fn offline() -> Self {
            FakeGateway {
                offline: true,
                ..FakeGateway::with_prices(&[])
            }
        }

        fn calls(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    fn rejection(err: CoreError) -> GatewayError {
        let code = match &err {
            CoreError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            CoreError::TotalMismatch { .. } => "TOTAL_MISMATCH",
            _ => "VALIDATION_ERROR",
        };
        GatewayError::Rejected {
            status: 400,
            code: code.to_string(),
            message: err.to_string(),
        }
    }

    #[async_trait]
    impl OrderGateway for FakeGateway {
        async fn submit_order(&self, submission: &OrderSubmission) -> Result<Order, GatewayError> {
            self.submitted.lock().unwrap().push(submission.clone());
            if self.offline {
                return Err(GatewayError::Transport("connection refused".to_string()));
            }

            let verified = verify_submission(submission.clone(), &self.catalog, TaxRate::from_bps(1500))
                .map_err(rejection)?;
            let order = verified.into_order("user-1", Utc::now());
            self.orders
                .lock()
                .unwrap()
                .insert(order.id.clone(), order.clone());
            Ok(order)
        }

        async fn capture_payment(&self, capture: &PaymentCapture) -> Result<Order, GatewayError> {
            let mut orders = self.orders.lock().unwrap();
            let order = orders.get_mut(&capture.order_id).ok_or(GatewayError::Rejected {
                status: 404,
                code: "NOT_FOUND".to_string(),
                message: "Order not found".to_string(),
            })?;
            if order.is_paid {
                return Err(GatewayError::Rejected {
                    status: 409,
                    code: "ORDER_ALREADY_PAID".to_string(),
                    message: "Order is already paid".to_string(),
                });
            }
            order.is_paid = true;
            order.transaction_id = Some(capture.transaction_id.clone());
            Ok(order.clone())
        }
    }

    fn line(id: &str, price_cents: i64, quantity: i64) -> LineItem {
        LineItem {
            product_id: id.to_string(),
            size: Some(Size::M),
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
            address2: Some("2B".to_string()),
            zip_code: "28001".to_string(),
            city: "Madrid".to_string(),
            country: "ES".to_string(),
            phone: "600000000".to_string(),
        }
    }

    fn store_with(lines: Vec<LineItem>, with_address: bool) -> CartStore<MemoryStore, RecordingNotifier> {
        let mut store = CartStore::new(
            MemoryStore::new(),
            RecordingNotifier::new(),
            TaxRate::from_bps(1500),
        );
        store.hydrate().unwrap();
        if with_address {
            store.set_address(address()).unwrap();
        }
        for line in lines {
            store.add_item(line).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_missing_address_fails_before_any_call() {
        let gateway = FakeGateway::with_prices(&[("A", 1000)]);
        let mut store = store_with(vec![line("A", 1000, 1)], false);

        let err = create_order(&mut store, &gateway).await.unwrap_err();
        assert!(matches!(err, CheckoutError::NoShippingAddress));
        assert_eq!(gateway.calls(), 0);
        assert_eq!(store.state().items.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_fails_before_any_call() {
        let gateway = FakeGateway::with_prices(&[("A", 1000)]);
        let mut store = store_with(vec![], true);

        let err = create_order(&mut store, &gateway).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_accepted_order_clears_cart_and_keeps_address() {
        let gateway = FakeGateway::with_prices(&[("A", 1000)]);
        let mut store = store_with(vec![line("A", 1000, 1), line("A", 1000, 2)], true);

        let order = create_order(&mut store, &gateway).await.unwrap();

        let sent = gateway.submitted.lock().unwrap()[0].clone();
        assert_eq!(sent.number_of_items, 3);
        assert_eq!(sent.subtotal, Decimal::from(30));
        assert_eq!(sent.total, Decimal::new(345, 1));

        assert!(!order.is_paid);
        assert_eq!(order.total, Decimal::new(3450, 2));

        assert!(store.state().items.is_empty());
        assert!(store.state().summary.is_zero());
        assert_eq!(store.state().shipping_address, Some(address()));
        assert!(!store.storage().contains(keys::CART));
        assert_eq!(
            store.notifier().messages().last().map(String::as_str),
            Some(ORDER_CREATED)
        );
    }

    #[tokio::test]
    async fn test_stale_price_is_rejected_and_cart_untouched() {
        let gateway = FakeGateway::with_prices(&[("A", 1200)]);
        let mut store = store_with(vec![line("A", 1000, 3)], true);
        let before = store.state().clone();

        let err = create_order(&mut store, &gateway).await.unwrap_err();
        match err {
            CheckoutError::Rejected { code, message } => {
                assert_eq!(code, "TOTAL_MISMATCH");
                assert!(message.contains("41.4"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        assert_eq!(store.state(), &before);
        assert!(store.storage().contains(keys::CART));
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let gateway = FakeGateway::with_prices(&[]);
        let mut store = store_with(vec![line("GHOST", 1000, 1)], true);

        let err = create_order(&mut store, &gateway).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Rejected { ref code, .. } if code == "PRODUCT_NOT_FOUND"));
        assert_eq!(store.state().items.len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_cart_for_retry() {
        let gateway = FakeGateway::offline();
        let mut store = store_with(vec![line("A", 1000, 1)], true);

        let err = create_order(&mut store, &gateway).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Transport(_)));
        assert_eq!(store.state().items.len(), 1);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_capture_payment_notifies() {
        let gateway = FakeGateway::with_prices(&[("A", 1000)]);
        let mut store = store_with(vec![line("A", 1000, 1)], true);
        let order = create_order(&mut store, &gateway).await.unwrap();
        let notifier = RecordingNotifier::new();

        let paid = capture_payment(&gateway, &notifier, &order.id, "TX-1")
            .await
            .unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.transaction_id.as_deref(), Some("TX-1"));

        let again = capture_payment(&gateway, &notifier, &order.id, "TX-2").await;
        assert!(matches!(again, Err(CheckoutError::Rejected { ref code, .. }) if code == "ORDER_ALREADY_PAID"));

        let sent = notifier.sent();
        assert_eq!(sent[0].message, PAYMENT_CAPTURED);
        assert_eq!(sent[1].message, PAYMENT_FAILED);
        assert_eq!(sent[1].variant, NotificationVariant::Error);
    }
}

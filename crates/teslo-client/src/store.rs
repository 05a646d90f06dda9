//! # Cart Store
//!
//! Owns the shopper's cart: the current [`CartState`], the durable storage
//! it is snapshotted to, the notifier for toasts, and the tax rate used to
//! price it. All writes go through the methods here.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  store.add_item(line)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reduce(state, AddItem, rate) ──Err──► state untouched, error returned │
//! │       │ Ok(next)                                                        │
//! │       ▼                                                                 │
//! │  state = next (totals already recomputed)                              │
//! │       │                                                                 │
//! │       ├── items non-empty? ──► storage["cart"] = JSON snapshot         │
//! │       └── items empty?     ──► storage["cart"] removed                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  notifier: "Added to cart!"                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An empty cart is never written. Removing the snapshot instead means a
//! later [`CartStore::hydrate`] starts from an empty cart rather than a
//! stale one.

use tracing::{debug, warn};

use teslo_core::cart::{reduce, CartAction, CartState};
use teslo_core::{LineItem, ShippingAddress, Size, TaxRate};

use crate::error::ClientResult;
use crate::notify::{Notification, Notifier, ADDED_TO_CART, REMOVED_FROM_CART};
use crate::storage::{keys, KeyValueStore};

/// The cart, its storage and its notifier.
///
/// ## Usage
/// ```rust,ignore
/// let mut store = CartStore::new(FileStore::open_default()?, TracingNotifier, config.tax_rate()?);
/// store.hydrate()?;
///
/// store.add_item(product.to_line_item(Some(Size::M), 1))?;
/// println!("{} items, total {}", store.state().summary.number_of_items, store.state().summary.total);
/// ```
#[derive(Debug)]
pub struct CartStore<S, N> {
    state: CartState,
    storage: S,
    notifier: N,
    tax_rate: TaxRate,
}

impl<S: KeyValueStore, N: Notifier> CartStore<S, N> {
    /// Creates a store in the not-yet-loaded state.
    pub fn new(storage: S, notifier: N, tax_rate: TaxRate) -> Self {
        CartStore {
            state: CartState::new(),
            storage,
            notifier,
            tax_rate,
        }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Gives back the storage and notifier.
    pub fn into_parts(self) -> (S, N) {
        (self.storage, self.notifier)
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Loads the cart snapshot and the saved address.
    ///
    /// Runs once; later calls leave the state alone. A missing or
    /// unreadable snapshot yields an empty cart. Nothing is written back.
    /// If the address cannot be read the cart stays unloaded and the next
    /// call tries again.
    pub fn hydrate(&mut self) -> ClientResult<()> {
        if self.state.is_loaded {
            debug!("Cart already hydrated");
            return Ok(());
        }

        let snapshot = self.read_snapshot();
        let address = self.read_address()?;

        let mut next = reduce(&self.state, CartAction::LoadFromStorage(snapshot), self.tax_rate)?;
        if let Some(address) = address {
            next = reduce(&next, CartAction::LoadAddress(address), self.tax_rate)?;
        }
        self.state = next;

        debug!(
            lines = self.state.items.len(),
            has_address = self.state.shipping_address.is_some(),
            "Cart hydrated"
        );
        Ok(())
    }

    fn read_snapshot(&self) -> Vec<LineItem> {
        let raw = match self.storage.get(keys::CART) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not read cart snapshot, starting empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Cart snapshot is unreadable, starting empty");
            Vec::new()
        })
    }

    fn read_address(&self) -> ClientResult<Option<ShippingAddress>> {
        let Some(first_name) = self.storage.get(keys::FIRST_NAME)? else {
            return Ok(None);
        };

        let field = |key: &str| -> ClientResult<String> {
            Ok(self.storage.get(key)?.unwrap_or_default())
        };

        let address2 = field(keys::ADDRESS2)?;

        Ok(Some(ShippingAddress {
            first_name,
            last_name: field(keys::LAST_NAME)?,
            address: field(keys::ADDRESS)?,
            address2: (!address2.is_empty()).then_some(address2),
            zip_code: field(keys::ZIP_CODE)?,
            city: field(keys::CITY)?,
            country: field(keys::COUNTRY)?,
            phone: field(keys::PHONE)?,
        }))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a line, merging with an existing (product, size) line.
    pub fn add_item(&mut self, line: LineItem) -> ClientResult<()> {
        self.apply(CartAction::AddItem(line))?;
        self.notifier.notify(Notification::success(ADDED_TO_CART));
        Ok(())
    }

    /// Replaces the quantity of an existing line.
    pub fn set_quantity(&mut self, product_id: &str, size: Size, quantity: i64) -> ClientResult<()> {
        self.apply(CartAction::SetQuantity {
            product_id: product_id.to_string(),
            size,
            quantity,
        })
    }

    pub fn remove_item(&mut self, product_id: &str, size: Size) -> ClientResult<()> {
        self.apply(CartAction::RemoveItem {
            product_id: product_id.to_string(),
            size,
        })?;
        self.notifier.notify(Notification::error(REMOVED_FROM_CART));
        Ok(())
    }

    /// Saves the checkout address, field by field.
    pub fn set_address(&mut self, address: ShippingAddress) -> ClientResult<()> {
        self.state = reduce(&self.state, CartAction::SetAddress(address), self.tax_rate)?;

        if let Some(address) = &self.state.shipping_address {
            let fields = [
                (keys::FIRST_NAME, address.first_name.as_str()),
                (keys::LAST_NAME, address.last_name.as_str()),
                (keys::ADDRESS, address.address.as_str()),
                (keys::ADDRESS2, address.address2.as_deref().unwrap_or("")),
                (keys::ZIP_CODE, address.zip_code.as_str()),
                (keys::CITY, address.city.as_str()),
                (keys::COUNTRY, address.country.as_str()),
                (keys::PHONE, address.phone.as_str()),
            ];
            for (key, value) in fields {
                self.storage.set(key, value)?;
            }
        }
        Ok(())
    }

    /// Clears the line items after the server accepted the order.
    ///
    /// The shipping address stays for the next order.
    pub fn complete_order(&mut self) -> ClientResult<()> {
        self.apply(CartAction::OrderComplete)
    }

    /// Runs a line-item transition and snapshots the result.
    ///
    /// On a storage error the new state is kept and the error returned.
    fn apply(&mut self, action: CartAction) -> ClientResult<()> {
        self.state = reduce(&self.state, action, self.tax_rate)?;
        self.persist_cart()
    }

    fn persist_cart(&mut self) -> ClientResult<()> {
        if self.state.is_empty() {
            self.storage.remove(keys::CART)?;
            return Ok(());
        }

        let snapshot = serde_json::to_string(&self.state.items)
            .map_err(crate::error::StorageError::from)?;
        self.storage.set(keys::CART, &snapshot)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

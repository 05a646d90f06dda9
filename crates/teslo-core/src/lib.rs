//! # teslo-core: Pure Business Logic for Teslo Shop
//!
//! This crate is the **heart** of Teslo Shop. It contains the cart state
//! machine, the pricing rules and the server-side order verification as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Teslo Shop Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────┐    ┌──────────────────────────────┐  │
//! │  │  teslo-client (storefront)   │    │  apps/api (HTTP server)      │  │
//! │  │  CartStore ─► checkout flow  │───►│  POST /api/orders            │  │
//! │  └──────────────┬───────────────┘    └──────────────┬───────────────┘  │
//! │                 │                                   │                   │
//! │  ┌──────────────▼───────────────────────────────────▼───────────────┐  │
//! │  │               ★ teslo-core (THIS CRATE) ★                         │  │
//! │  │                                                                   │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌─────────┐  ┌───────┐ │  │
//! │  │   │  money  │  │ pricing │  │   cart   │  │  order  │  │ valid │ │  │
//! │  │   │  Money  │  │ Summary │  │ reducer  │  │ verify  │  │ rules │ │  │
//! │  │   │ TaxRate │  │         │  │ actions  │  │         │  │       │ │  │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └─────────┘  └───────┘ │  │
//! │  │                                                                   │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS             │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                     │                                   │
//! │  ┌──────────────────────────────────▼────────────────────────────────┐  │
//! │  │                    teslo-db (Database Layer)                      │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Order, User, etc.)
//! - [`money`] - Money and TaxRate with integer arithmetic
//! - [`pricing`] - Derived totals (item count, subtotal, tax, total)
//! - [`cart`] - Cart state machine (`reduce(state, action)`)
//! - [`order`] - Server-side verification of submitted orders
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, storage access is FORBIDDEN here
//! 3. **Exact Money**: Prices are integer cents, totals are exact decimals
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use teslo_core::money::{Money, TaxRate};
//! use teslo_core::pricing::compute_summary;
//! use rust_decimal::Decimal;
//!
//! let rate = TaxRate::from_bps(1500); // 15%
//! let summary = compute_summary([(Money::from_cents(1000), 3)], rate).unwrap();
//!
//! assert_eq!(summary.number_of_items, 3);
//! assert_eq!(summary.subtotal, Decimal::new(30, 0));
//! assert_eq!(summary.tax, Decimal::new(45, 1));
//! assert_eq!(summary.total, Decimal::new(345, 1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use teslo_core::Money` instead of
// `use teslo_core::money::Money`

pub use cart::{CartAction, CartState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate};
pub use pricing::OrderSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order documents a reasonable size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted for a product, in cents (1,000,000.00).
///
/// A full cart at this price and [`MAX_ITEM_QUANTITY`] stays well inside
/// the `i64` cents range.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Stock level at or below which a product counts as "low stock" on the
/// admin dashboard.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

//! # teslo-client: Storefront Cart Runtime for Teslo Shop
//!
//! Everything the shopper's side needs between "Add to cart" and "Place
//! order": a cart that survives restarts, toasts, and the order submission.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        CartStore                                 │  │
//! │  │                                                                  │  │
//! │  │  hydrate ─► add_item / set_quantity / remove_item / set_address  │  │
//! │  │     │            │                                               │  │
//! │  │     │            └──► teslo_core::cart::reduce (pure)            │  │
//! │  └─────┼────────────────────────┬─────────────────────┬─────────────┘  │
//! │        ▼                        ▼                     ▼                │
//! │  ┌────────────────┐   ┌───────────────────┐   ┌────────────────┐       │
//! │  │ KeyValueStore  │   │     Notifier      │   │   checkout     │       │
//! │  │ memory / file  │   │ toasts (2000 ms)  │   │ create_order   │       │
//! │  └────────────────┘   └───────────────────┘   └───────┬────────┘       │
//! │                                                       ▼                │
//! │                                              ┌────────────────┐        │
//! │                                              │  OrderGateway  │        │
//! │                                              │  HttpGateway   │        │
//! │                                              └────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`store`] - `CartStore`, the single owner of cart state
//! - [`storage`] - Durable key/value storage and its key names
//! - [`notify`] - Transient notifications
//! - [`checkout`] - Order submission and payment capture
//! - [`gateway`] - HTTP client for the order endpoints
//! - [`config`] - Client configuration (API URL, tax rate, storage path)
//! - [`error`] - Client error types
//!
//! ## Usage
//! ```rust,ignore
//! let config = ClientConfig::load(None)?;
//! let storage = match config.storage_path() {
//!     Some(path) => FileStore::open(path)?,
//!     None => FileStore::open_default()?,
//! };
//!
//! let mut cart = CartStore::new(storage, TracingNotifier, config.tax_rate()?);
//! cart.hydrate()?;
//!
//! let gateway = HttpGateway::new(config.api_url(), Some(&token))?;
//! let order = checkout::create_order(&mut cart, &gateway).await?;
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod storage;
pub mod store;

pub use checkout::{capture_payment, create_order};
pub use config::ClientConfig;
pub use error::{CheckoutError, ClientError, ClientResult, GatewayError, StorageError};
pub use gateway::{HttpGateway, OrderGateway, PaymentCapture};
pub use notify::{Notification, NotificationVariant, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::CartStore;

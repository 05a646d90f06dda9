//! # Repository Module
//!
//! Database repository implementations for Teslo Shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP service                                                          │
//! │       │                                                                 │
//! │       │  db.products().prices_for(&ids)                                │
//! │       ▼                                                                 │
//! │  ProductRepository / OrderRepository / UserRepository                  │
//! │       │                                                                 │
//! │       │  Row struct (FromRow) ──TryFrom──► teslo-core type             │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries use the runtime `sqlx::query_as::<_, Row>()` API. List columns
//! and the shipping address are JSON text, decimal amounts are text, and
//! each repository decodes its rows into teslo-core types.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads, search and admin writes
//! - [`OrderRepository`](order::OrderRepository) - Order placement, history and payment
//! - [`UserRepository`](user::UserRepository) - Accounts and roles

pub mod order;
pub mod product;
pub mod user;

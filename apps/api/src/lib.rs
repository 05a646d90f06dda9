//! # Teslo API
//!
//! HTTP server behind the storefront and the admin console.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            API Services                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  user          │  │  catalog       │  │  orders                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • products     │  │ • place (re-priced ★)      ││
//! │  │ • login        │  │ • by slug      │  │ • history / detail         ││
//! │  │ • validate     │  │ • search       │  │ • pay (once)               ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐            │
//! │  │  admin         │  │  seed          │  │  health        │            │
//! │  │ dashboard,     │  │ dev only       │  │                │            │
//! │  │ users, orders, │  │                │  │                │            │
//! │  │ products       │  │                │  │                │            │
//! │  └────────────────┘  └────────────────┘  └────────────────┘            │
//! │                                                                         │
//! │  Infrastructure: teslo-db (SQLite) • JwtManager • TraceLayer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `TESLO_HOST` / `TESLO_PORT` - bind address (default: 0.0.0.0:3000)
//! - `TESLO_DATABASE_PATH` - SQLite file (default: teslo.db)
//! - `TESLO_JWT_SECRET` - token signing secret (required in production)
//! - `TESLO_JWT_LIFETIME_SECS` - token lifetime (default: 2592000)
//! - `TESLO_TAX_RATE` - decimal fraction (default: 0.15)
//! - `TESLO_ENV` - development | production

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod services;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

use crate::auth::JwtManager;
use teslo_db::Database;

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        AppState { db, jwt, config }
    }
}

/// Builds the full router.
pub fn build_router(state: Arc<AppState>) -> Router {
    use services::{admin, catalog, health, orders, seed, user};

    let api = Router::new()
        .route("/user/register", post(user::register))
        .route("/user/login", post(user::login))
        .route("/user/validate-token", get(user::validate_token))
        .route("/products", get(catalog::list_products))
        .route("/products/{slug}", get(catalog::product_by_slug))
        .route("/search/{query}", get(catalog::search))
        .route("/orders", post(orders::place_order).get(orders::order_history))
        .route("/orders/pay", post(orders::pay_order))
        .route("/orders/{id}", get(orders::order_by_id))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/users", get(admin::list_users).put(admin::update_user_role))
        .route("/admin/orders", get(admin::list_orders))
        .route(
            "/admin/products",
            get(admin::list_products)
                .post(admin::create_product)
                .put(admin::update_product),
        )
        .route("/seed", post(seed::run_seed));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! # Orders
//!
//! The server-side trust boundary. A submission's prices and totals are
//! claims; nothing is stored until they have been recomputed from the
//! catalog.
//!
//! ```text
//! POST /api/orders
//!   │
//!   ├── AuthUser          no / bad token          ──► 401 UNAUTHENTICATED
//!   ├── user still exists? no                     ──► 401 UNAUTHENTICATED
//!   ├── body parses?       no                     ──► 400 VALIDATION_ERROR
//!   ├── more lines than a cart holds?             ──► 400 VALIDATION_ERROR
//!   ├── catalog prices for every productId
//!   ├── verify_submission  unknown product        ──► 400 PRODUCT_NOT_FOUND
//!   │                      claimed ≠ recomputed   ──► 400 TOTAL_MISMATCH
//!   ├── into_order (unpaid, catalog prices, total rounded to cents)
//!   └── insert (order + items in one transaction) ──► 201 Order
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use teslo_core::order::verify_submission;
use teslo_core::{CoreError, Order, OrderSubmission, ValidationError, MAX_CART_ITEMS};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

/// Body of `POST /api/orders/pay`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub order_id: String,
    pub transaction_id: String,
}

/// `POST /api/orders`
pub async fn place_order(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ApiJson(submission): ApiJson<OrderSubmission>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    if state.db.users().get_by_id(&user.id).await?.is_none() {
        return Err(CoreError::Unauthenticated.into());
    }

    // Bounds the catalog lookup's bind parameters.
    if submission.order_items.len() > MAX_CART_ITEMS {
        warn!(
            user_id = %user.id,
            lines = submission.order_items.len(),
            "Order submission has too many lines"
        );
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        }
        .into());
    }

    let ids: Vec<String> = submission
        .order_items
        .iter()
        .map(|item| item.product_id.clone())
        .collect();
    let prices = state.db.products().prices_for(&ids).await?;

    let verified = verify_submission(submission, &prices, state.config.tax_rate).map_err(|e| {
        warn!(user_id = %user.id, error = %e, "Order submission refused");
        ApiError::from(e)
    })?;

    let order = verified.into_order(&user.id, Utc::now());
    let order = state.db.orders().insert(&order).await?;

    info!(
        order_id = %order.id,
        user_id = %user.id,
        items = order.number_of_items,
        total = %order.total,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders`: the caller's orders, newest first.
pub async fn order_history(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = state.db.orders().list_by_user(&user.id).await?;
    Ok(Json(orders))
}

/// Loads an order the caller may see. Other users' orders are reported as
/// missing; admins see every order.
async fn visible_order(state: &AppState, user: &AuthUser, id: &str) -> ApiResult<Order> {
    let order = state
        .db
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;

    if !order.is_owned_by(&user.id) && !user.role.is_admin() {
        warn!(order_id = %id, user_id = %user.id, "Order requested by non-owner");
        return Err(ApiError::not_found("Order"));
    }

    Ok(order)
}

/// `GET /api/orders/{id}`
pub async fn order_by_id(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    visible_order(&state, &user, &id).await.map(Json)
}

/// `POST /api/orders/pay`: records a captured payment, once.
pub async fn pay_order(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PayRequest>,
) -> ApiResult<Json<Order>> {
    let transaction_id = req.transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(ValidationError::required("transactionId").into());
    }

    let order = state
        .db
        .orders()
        .get_by_id(&req.order_id)
        .await?
        .filter(|order| order.is_owned_by(&user.id))
        .ok_or_else(|| ApiError::not_found("Order"))?;

    if order.is_paid || !state.db.orders().mark_paid(&order.id, transaction_id).await? {
        warn!(order_id = %order.id, "Payment for an already paid order");
        return Err(CoreError::OrderAlreadyPaid(order.id).into());
    }

    let paid = state
        .db
        .orders()
        .get_by_id(&order.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;

    info!(order_id = %paid.id, transaction_id = %transaction_id, "Payment captured");
    Ok(Json(paid))
}

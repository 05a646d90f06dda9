//! # Order Repository
//!
//! Database operations for placed orders and their items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  insert()  ── BEGIN ── orders row ── order_items rows ── COMMIT         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  is_paid = 0, transaction_id = NULL                                     │
//! │     │                                                                   │
//! │     │  mark_paid(id, "PAYPAL-TX")                                       │
//! │     ▼                                                                   │
//! │  is_paid = 1, paid_at = now, transaction_id = "PAYPAL-TX"               │
//! │     │                                                                   │
//! │     │  mark_paid(id, ...) again → Ok(false), row untouched              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are stored as decimal text so they come back exactly as written.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use teslo_core::{Gender, Order, OrderItem, Size};

const ORDER_COLUMNS: &str = "id, user_id, shipping_address, payment_method, number_of_items, \
     subtotal, tax, total, is_paid, paid_at, transaction_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    shipping_address: String,
    payment_method: Option<String>,
    number_of_items: i64,
    subtotal: String,
    tax: String,
    total: String,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: String,
    product_id: String,
    title: String,
    size: Size,
    quantity: i64,
    slug: String,
    image: String,
    unit_price_cents: i64,
    gender: Gender,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            product_id: row.product_id,
            title: row.title,
            size: row.size,
            quantity: row.quantity,
            slug: row.slug,
            image: row.image,
            unit_price_cents: row.unit_price_cents,
            gender: row.gender,
        }
    }
}

impl OrderRow {
    fn into_order(self, order_items: Vec<OrderItem>) -> DbResult<Order> {
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            order_items,
            shipping_address: serde_json::from_str(&self.shipping_address)?,
            payment_method: self.payment_method,
            number_of_items: self.number_of_items,
            subtotal: Decimal::from_str(&self.subtotal)?,
            tax: Decimal::from_str(&self.tax)?,
            total: Decimal::from_str(&self.total)?,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let order = verified.into_order(&user.id, Utc::now());
/// db.orders().insert(&order).await?;
///
/// let history = db.orders().list_by_user(&user.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and all of its items in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Owning user doesn't exist
    pub async fn insert(&self, order: &Order) -> DbResult<Order> {
        debug!(id = %order.id, items = order.order_items.len(), "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, shipping_address, payment_method, number_of_items,
                subtotal, tax, total, is_paid, paid_at, transaction_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(serde_json::to_string(&order.shipping_address)?)
        .bind(&order.payment_method)
        .bind(order.number_of_items)
        .bind(order.subtotal.to_string())
        .bind(order.tax.to_string())
        .bind(order.total.to_string())
        .bind(order.is_paid)
        .bind(order.paid_at)
        .bind(&order.transaction_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.order_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, position, product_id, title, size, quantity,
                    slug, image, unit_price_cents, gender
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&order.id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(&item.title)
            .bind(item.size)
            .bind(item.quantity)
            .bind(&item.slug)
            .bind(&item.image)
            .bind(item.unit_price_cents)
            .bind(item.gender)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(id = %order.id, user_id = %order.user_id, total = %order.total, "Order stored");
        Ok(order.clone())
    }

    /// Gets an order with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Orders placed by one user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Every order, newest first (admin view).
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Loads the items of all `rows` in a single query and builds the orders.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT order_id, product_id, title, size, quantity, slug, image, \
             unit_price_cents, gender FROM order_items WHERE order_id IN (",
        );
        let mut separated = builder.separated(", ");
        for row in &rows {
            separated.push_bind(row.id.clone());
        }
        separated.push_unseparated(") ORDER BY order_id, position");

        let item_rows: Vec<OrderItemRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut items: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            items
                .entry(item.order_id.clone())
                .or_default()
                .push(item.into());
        }

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }

    /// Marks an unpaid order as paid.
    ///
    /// ## Returns
    /// * `Ok(true)` - The order moved from unpaid to paid
    /// * `Ok(false)` - The order was already paid; nothing changed
    /// * `Err(DbError::NotFound)` - No such order
    pub async fn mark_paid(&self, id: &str, transaction_id: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                is_paid = 1,
                paid_at = ?2,
                transaction_id = ?3,
                updated_at = ?2
            WHERE id = ?1 AND is_paid = 0
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(transaction_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            info!(id = %id, transaction_id = %transaction_id, "Order paid");
            return Ok(true);
        }

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if exists == 0 {
            return Err(DbError::not_found("Order", id));
        }
        Ok(false)
    }

    /// Total number of orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_paid(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE is_paid = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_pending(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE is_paid = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Removes every order (items cascade). Used by the seeder only.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM orders")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

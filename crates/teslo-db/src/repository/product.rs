//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Storefront reads: list by gender, lookup by slug, title/tag search
//! - Price lookup for order verification ([`ProductRepository::prices_for`])
//! - Admin writes and dashboard counters
//!
//! ## Price Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/orders  { orderItems: [A×3, B×1, A×2] }                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prices_for(["A", "B", "A"])                                           │
//! │       │   SELECT id, price_cents FROM products WHERE id IN (?, ?, ?)   │
//! │       ▼                                                                 │
//! │  { "A": $10.00, "B": $25.00 }   ← ids absent from the map are unknown  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use teslo_core::{Gender, Money, Product, ProductType, LOW_STOCK_THRESHOLD};

const PRODUCT_COLUMNS: &str = "id, title, description, images, in_stock, price_cents, sizes, \
     slug, tags, product_type, gender, created_at, updated_at";

/// Raw `products` row; list columns are JSON text.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    description: String,
    images: String,
    in_stock: i64,
    price_cents: i64,
    sizes: String,
    slug: String,
    tags: String,
    product_type: ProductType,
    gender: Gender,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            title: row.title,
            description: row.description,
            images: serde_json::from_str(&row.images)?,
            in_stock: row.in_stock,
            price_cents: row.price_cents,
            sizes: serde_json::from_str(&row.sizes)?,
            slug: row.slug,
            tags: serde_json::from_str(&row.tags)?,
            product_type: row.product_type,
            gender: row.gender,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode_all(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let women = repo.list(Some(Gender::Women)).await?;
/// let tee = repo.get_by_slug("kids_cybertruck_tee").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the catalog, optionally filtered by gender, sorted by title.
    pub async fn list(&self, gender: Option<Gender>) -> DbResult<Vec<Product>> {
        let rows = match gender {
            Some(gender) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE gender = ?1 ORDER BY title"
                ))
                .bind(gender)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY title"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = rows.len(), ?gender, "Listed products");
        decode_all(rows)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its URL slug.
    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = ?1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Case-insensitive substring search over title and tags.
    ///
    /// `term` is expected already trimmed and lowercased
    /// (see `teslo_core::validation::validate_search_query`).
    pub async fn search(&self, term: &str) -> DbResult<Vec<Product>> {
        let pattern = format!("%{}%", term);

        debug!(term = %term, "Searching products");

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE lower(title) LIKE ?1 OR lower(tags) LIKE ?1 \
             ORDER BY title"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned products");
        decode_all(rows)
    }

    /// Returns the current catalog price of each known product id.
    ///
    /// Duplicated ids are fine; unknown ids are simply absent from the map.
    pub async fn prices_for(&self, ids: &[String]) -> DbResult<HashMap<String, Money>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, price_cents FROM products WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows: Vec<(String, i64)> = builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, cents)| (id, Money::from_cents(cents)))
            .collect())
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Slug already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(slug = %product.slug, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, description, images, in_stock, price_cents, sizes,
                slug, tags, product_type, gender, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(serde_json::to_string(&product.images)?)
        .bind(product.in_stock)
        .bind(product.price_cents)
        .bind(serde_json::to_string(&product.sizes)?)
        .bind(&product.slug)
        .bind(serde_json::to_string(&product.tags)?)
        .bind(product.product_type)
        .bind(product.gender)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.slug),
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Updates an existing product and returns it with a fresh `updated_at`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                title = ?2,
                description = ?3,
                images = ?4,
                in_stock = ?5,
                price_cents = ?6,
                sizes = ?7,
                slug = ?8,
                tags = ?9,
                product_type = ?10,
                gender = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(serde_json::to_string(&product.images)?)
        .bind(product.in_stock)
        .bind(product.price_cents)
        .bind(serde_json::to_string(&product.sizes)?)
        .bind(&product.slug)
        .bind(serde_json::to_string(&product.tags)?)
        .bind(product.product_type)
        .bind(product.gender)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(Product {
            updated_at: now,
            ..product.clone()
        })
    }

    /// Total number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Products with nothing in stock.
    pub async fn count_out_of_stock(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE in_stock = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Products at or below [`LOW_STOCK_THRESHOLD`] units.
    pub async fn count_low_stock(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE in_stock <= ?1")
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Removes every product. Used by the seeder only.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

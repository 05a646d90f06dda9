//! Admin console: dashboard counters, user roles, every order and the
//! product catalog. Every handler takes [`AdminUser`].

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use teslo_core::validation::validate_product;
use teslo_core::{
    DashboardSummary, Gender, Order, Product, ProductType, Role, Size, User, ValidationError,
};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

/// `GET /api/admin/dashboard`
pub async fn dashboard(
    AdminUser(_): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardSummary>> {
    let orders = state.db.orders();
    let products = state.db.products();
    let users = state.db.users();

    let (
        number_of_orders,
        paid_orders,
        pending_orders,
        number_of_clients,
        number_of_products,
        out_of_stock_products,
        low_stock_products,
    ) = tokio::try_join!(
        orders.count(),
        orders.count_paid(),
        orders.count_pending(),
        users.count_clients(),
        products.count(),
        products.count_out_of_stock(),
        products.count_low_stock(),
    )?;

    Ok(Json(DashboardSummary {
        number_of_orders,
        paid_orders,
        pending_orders,
        number_of_clients,
        number_of_products,
        out_of_stock_products,
        low_stock_products,
    }))
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub user_id: String,
    pub role: String,
}

/// `GET /api/admin/users`
pub async fn list_users(
    AdminUser(_): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db.users().list().await?))
}

/// `PUT /api/admin/users`
pub async fn update_user_role(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RoleUpdate>,
) -> ApiResult<Json<User>> {
    let role: Role = req.role.parse()?;
    let user = state.db.users().update_role(&req.user_id, role).await?;

    info!(admin_id = %admin.id, user_id = %user.id, role = %role, "User role changed");
    Ok(Json(user))
}

/// `GET /api/admin/orders`
pub async fn list_orders(
    AdminUser(_): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db.orders().list_all().await?))
}

// =============================================================================
// Products
// =============================================================================

/// Product form as sent by the admin console. `id` is absent on create.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub in_stock: i64,
    pub price_cents: i64,
    pub sizes: Vec<Size>,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub gender: Gender,
}

impl ProductInput {
    /// Builds the stored product. Slugs become `lower_snake_case` and tags
    /// are lowercased.
    fn into_product(self, id: String, created_at: DateTime<Utc>) -> Product {
        let slug = self
            .slug
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        let tags = self
            .tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        Product {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            images: self.images,
            in_stock: self.in_stock,
            price_cents: self.price_cents,
            sizes: self.sizes,
            slug,
            tags,
            product_type: self.product_type,
            gender: self.gender,
            created_at,
            updated_at: Utc::now(),
        }
    }
}

/// `GET /api/admin/products`
pub async fn list_products(
    AdminUser(_): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list(None).await?))
}

/// `POST /api/admin/products`
pub async fn create_product(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = input.into_product(Uuid::new_v4().to_string(), Utc::now());
    validate_product(&product)?;

    let product = state.db.products().insert(&product).await?;

    info!(admin_id = %admin.id, product_id = %product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products`
pub async fn update_product(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<Json<Product>> {
    let id = input
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ValidationError::required("id"))?;

    let existing = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    let product = input.into_product(id, existing.created_at);
    validate_product(&product)?;

    let product = state.db.products().update(&product).await?;

    info!(admin_id = %admin.id, product_id = %product.id, "Product updated");
    Ok(Json(product))
}

//! # Domain Types
//!
//! Core domain types used throughout Teslo Shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, slug       │──►│  product_id     │──►│  order_items    │       │
//! │  │  price_cents    │   │  size (Option)  │   │  (size required)│       │
//! │  │  sizes, stock   │   │  unit_price     │   │  totals, isPaid │       │
//! │  └─────────────────┘   │  quantity       │   │  transaction_id │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ShippingAddress │   │      User       │   │  Size / Gender  │       │
//! │  │  first/last     │   │  email, role    │   │  ProductType    │       │
//! │  │  address2 (opt) │   │                 │   │  Role           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`LineItem`] captures the unit price when the shopper adds the product;
//! it is never looked up again on the client. An [`OrderItem`] freezes the
//! line at checkout time. Only the server's order verification consults the
//! live catalog price.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Size
// =============================================================================

/// Garment size offered for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
    XXXL,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Size; 7] = [
        Size::XS,
        Size::S,
        Size::M,
        Size::L,
        Size::XL,
        Size::XXL,
        Size::XXXL,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::XS => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
            Size::XXXL => "XXXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Gender (catalog category)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kid,
    Unisex,
}

// =============================================================================
// Product Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Shirts,
    Pants,
    Hoodies,
    Hats,
}

// =============================================================================
// Role
// =============================================================================

/// Account role.
///
/// ## Access
/// ```text
/// client      → storefront, own orders
/// admin       ┐
/// super-user  ├→ storefront + admin console
/// SEO         ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Client,
    Admin,
    SuperUser,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "SEO"))]
    #[serde(rename = "SEO")]
    Seo,
}

impl Role {
    /// Whether this role may use the admin console.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperUser | Role::Seo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::SuperUser => "super-user",
            Role::Seo => "SEO",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            "super-user" => Ok(Role::SuperUser),
            "SEO" => Ok(Role::Seo),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: ["client", "admin", "super-user", "SEO"]
                    .iter()
                    .map(|r| r.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub title: String,

    pub description: String,

    /// Image file names, first one is the listing thumbnail.
    pub images: Vec<String>,

    /// Units in stock.
    pub in_stock: i64,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    pub sizes: Vec<Size>,

    /// URL-safe unique identifier used by product pages.
    pub slug: String,

    pub tags: Vec<String>,

    #[serde(rename = "type")]
    pub product_type: ProductType,

    pub gender: Gender,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.in_stock <= 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.in_stock <= LOW_STOCK_THRESHOLD
    }

    /// Builds a cart line for this product, capturing the current price.
    ///
    /// ## User Workflow
    /// ```text
    /// Product page: pick size M, quantity 2
    ///      │
    ///      ▼
    /// product.to_line_item(Some(M), 2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// CartStore::add_item(line)
    /// ```
    pub fn to_line_item(&self, size: Option<Size>, quantity: i64) -> LineItem {
        LineItem {
            product_id: self.id.clone(),
            size,
            unit_price_cents: self.price_cents,
            quantity,
            title: self.title.clone(),
            image: self.images.first().cloned().unwrap_or_default(),
            slug: self.slug.clone(),
            gender: self.gender,
        }
    }
}

// =============================================================================
// Line Item (cart)
// =============================================================================

/// One (product, size) entry in a cart.
///
/// The size stays `None` until the shopper selects one; the cart refuses
/// lines without a size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub size: Option<Size>,
    /// Unit price in cents at add time (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub title: String,
    pub image: String,
    pub slug: String,
    pub gender: Gender,
}

impl LineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Whether this line is the (product, size) pair.
    pub fn is_same_line(&self, product_id: &str, size: Size) -> bool {
        self.product_id == product_id && self.size == Some(size)
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub zip_code: String,
    pub city: String,
    pub country: String,
    pub phone: String,
}

// =============================================================================
// Order Item
// =============================================================================

/// A frozen order line. Unlike [`LineItem`], the size is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    pub size: Size,
    pub quantity: i64,
    pub slug: String,
    pub image: String,
    /// Unit price in cents as claimed by the client.
    pub unit_price_cents: i64,
    pub gender: Gender,
}

impl TryFrom<&LineItem> for OrderItem {
    type Error = ValidationError;

    fn try_from(line: &LineItem) -> Result<Self, Self::Error> {
        let size = line.size.ok_or_else(|| ValidationError::required("size"))?;

        Ok(OrderItem {
            product_id: line.product_id.clone(),
            title: line.title.clone(),
            size,
            quantity: line.quantity,
            slug: line.slug.clone(),
            image: line.image.clone(),
            unit_price_cents: line.unit_price_cents,
            gender: line.gender,
        })
    }
}

// =============================================================================
// Order Submission (client → server)
// =============================================================================

/// What the storefront sends to `POST /api/orders`.
///
/// The totals are claims: the server recomputes them from catalog prices
/// before anything is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub number_of_items: i64,
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub tax: Decimal,
    #[ts(as = "String")]
    pub total: Decimal,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
///
/// Immutable after creation except for the payment fields, which move once
/// from unpaid to paid (`is_paid` false → true, `transaction_id` None → id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Owning user.
    pub user_id: String,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
    pub number_of_items: i64,
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub tax: Decimal,
    /// Rounded to two decimal places.
    #[ts(as = "String")]
    pub total: Decimal,
    pub is_paid: bool,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account (the password hash never leaves teslo-db).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Always lowercase.
    pub email: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Admin Dashboard
// =============================================================================

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub number_of_orders: i64,
    pub paid_orders: i64,
    pub pending_orders: i64,
    pub number_of_clients: i64,
    pub number_of_products: i64,
    pub out_of_stock_products: i64,
    /// Products with 10 or fewer units in stock.
    pub low_stock_products: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "A".to_string(),
            title: "Men's Chill Crew Neck Sweatshirt".to_string(),
            description: "Warm".to_string(),
            images: vec!["1740176-00-A_0_2000.jpg".to_string(), "1740176-00-A_1.jpg".to_string()],
            in_stock: 7,
            price_cents: 7500,
            sizes: vec![Size::XS, Size::S, Size::M],
            slug: "mens_chill_crew_neck_sweatshirt".to_string(),
            tags: vec!["sweatshirt".to_string()],
            product_type: ProductType::Shirts,
            gender: Gender::Men,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperUser).unwrap(), "\"super-user\"");
        assert_eq!(serde_json::to_string(&Role::Seo).unwrap(), "\"SEO\"");
        let role: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, Role::Client);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_role_parses_wire_names_only() {
        assert_eq!("super-user".parse::<Role>().unwrap(), Role::SuperUser);
        assert_eq!("SEO".parse::<Role>().unwrap(), Role::Seo);
        assert!(matches!(
            "root".parse::<Role>(),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_role_admin_access() {
        assert!(!Role::Client.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperUser.is_admin());
        assert!(Role::Seo.is_admin());
    }

    #[test]
    fn test_product_stock_flags() {
        let mut product = sample_product();
        assert!(product.is_low_stock());
        assert!(!product.is_out_of_stock());

        product.in_stock = 0;
        assert!(product.is_out_of_stock());

        product.in_stock = 11;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_to_line_item_captures_price_and_thumbnail() {
        let line = sample_product().to_line_item(Some(Size::M), 2);
        assert_eq!(line.unit_price_cents, 7500);
        assert_eq!(line.image, "1740176-00-A_0_2000.jpg");
        assert_eq!(line.line_total().cents(), 15000);
        assert!(line.is_same_line("A", Size::M));
        assert!(!line.is_same_line("A", Size::S));
    }

    #[test]
    fn test_order_item_requires_size() {
        let mut line = sample_product().to_line_item(None, 1);
        assert!(OrderItem::try_from(&line).is_err());

        line.size = Some(Size::S);
        let item = OrderItem::try_from(&line).unwrap();
        assert_eq!(item.size, Size::S);
    }

    #[test]
    fn test_shipping_address_camel_case() {
        let json = r#"{"firstName":"Ana","lastName":"Ruiz","address":"Calle 1",
            "zipCode":"28001","city":"Madrid","country":"ES","phone":"600000000"}"#;
        let address: ShippingAddress = serde_json::from_str(json).unwrap();
        assert_eq!(address.first_name, "Ana");
        assert_eq!(address.address2, None);
    }
}

//! # Validation Module
//!
//! Input validation utilities for Teslo Shop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (teslo-client)                                    │
//! │  ├── Cart preconditions (size chosen, quantity positive)               │
//! │  └── Address form required fields                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handlers (apps/api)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE constraints (email, slug)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use teslo_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("ana@example.com").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::{Product, ShippingAddress};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Minimum password length on registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length on registration.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum number of images on a catalog product.
pub const MIN_PRODUCT_IMAGES: usize = 2;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates an email address.
///
/// ## Example
/// ```rust
/// use teslo_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana@example").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "is not a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a registration password (at least 6 characters).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validates a registration display name (at least 2 characters).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the checkout address form.
///
/// Every field except `address2` is required.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: Address                                                      │
/// │                                                                         │
/// │  User submits form                                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_shipping_address() ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── blank field? → Error: "firstName is required"               │
/// │       │                                                                 │
/// │       └── OK → CartStore::set_address (persist each field)             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_shipping_address(address: &ShippingAddress) -> ValidationResult<()> {
    required("firstName", &address.first_name)?;
    required("lastName", &address.last_name)?;
    required("address", &address.address)?;
    required("zipCode", &address.zip_code)?;
    required("city", &address.city)?;
    required("country", &address.country)?;
    required("phone", &address.phone)?;
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents: zero up to MAX_PRICE_CENTS.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product slug: non-empty, no whitespace.
///
/// ## Example
/// ```rust
/// use teslo_core::validation::validate_slug;
///
/// assert!(validate_slug("kids_cybertruck_tee").is_ok());
/// assert!(validate_slug("kids cybertruck").is_err());
/// ```
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    required("slug", slug)?;

    if slug.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a product before it is written by the admin console.
///
/// Slug uniqueness is enforced by the database.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    required("title", &product.title)?;
    required("description", &product.description)?;
    validate_slug(&product.slug)?;
    validate_price_cents(product.price_cents)?;

    if product.in_stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "inStock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if product.images.len() < MIN_PRODUCT_IMAGES {
        return Err(ValidationError::InvalidFormat {
            field: "images".to_string(),
            reason: format!("at least {} images required", MIN_PRODUCT_IMAGES),
        });
    }

    if product.sizes.is_empty() {
        return Err(ValidationError::required("sizes"));
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed, lowercased query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.is_empty() {
        return Err(ValidationError::required("query"));
    }

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_lowercase())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Error Types
//!
//! Domain-specific error types for teslo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  teslo-core errors (this file)                                         │
//! │  ├── CoreError        - Cart and order rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  teslo-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  teslo-client errors                                                   │
//! │  └── CheckoutError    - What the storefront sees on checkout           │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - { code, message } JSON bodies                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP → CheckoutError   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Size;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The three trust-boundary
/// rejections (`ProductNotFound`, `TotalMismatch`, `Unauthenticated`) are
/// always surfaced to the submitter with their message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A submitted order references a product with no price on record.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The claimed order total differs from the total recomputed from
    /// catalog prices.
    ///
    /// ## User Workflow
    /// ```text
    /// Client claims total: 34.5
    ///      │
    ///      ▼
    /// Server recomputes from catalog: 36 × 1.15 = 41.4
    ///      │
    ///      ▼
    /// TotalMismatch { claimed: 34.5, expected: 41.4 }
    ///      │
    ///      ▼
    /// Storefront shows: "Total does not match with amount"
    /// ```
    #[error("Total does not match with amount (claimed {claimed}, expected {expected})")]
    TotalMismatch { claimed: Decimal, expected: Decimal },

    /// The caller has no authenticated identity.
    #[error("You have to be authenticated to do this")]
    Unauthenticated,

    /// Payment was already captured for this order.
    #[error("Order {0} is already paid")]
    OrderAlreadyPaid(String),

    /// No cart line exists for the (product, size) pair.
    #[error("Cart has no line for product {product_id} in size {size}")]
    LineItemNotFound { product_id: String, size: Size },

    /// Cart has exceeded maximum allowed line items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A subtotal or item count does not fit in the money range.
    #[error("Order amount is too large")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid email, slug with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., email already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

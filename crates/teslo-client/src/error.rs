//! # Client Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Client Error Categories                             │
//! │                                                                         │
//! │  StorageError   durable key/value store failed (disk, encoding)        │
//! │  GatewayError   the API answered with an error, or never answered      │
//! │  CheckoutError  what the place-order button reports to the shopper     │
//! │  ClientError    everything else: config, cart rule violations          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use teslo_core::CoreError;

/// Durable storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures talking to the API server.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server refused the request with a structured error body.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    /// Network failure, timeout, or an unreadable response.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Outcome of a failed checkout.
///
/// The cart is left exactly as it was for every variant.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No shipping address yet; nothing was sent.
    #[error("A shipping address is required before placing an order")]
    NoShippingAddress,

    /// Nothing to order; nothing was sent.
    #[error("Cart is empty")]
    EmptyCart,

    /// The cart could not be turned into an order (a line without a size).
    #[error("Cart is not ready for checkout: {0}")]
    InvalidCart(#[from] CoreError),

    /// Trust-boundary rejection (`TOTAL_MISMATCH`, `PRODUCT_NOT_FOUND`,
    /// `UNAUTHENTICATED`, ...).
    #[error("{message}")]
    Rejected { code: String, message: String },

    /// Generic failure; the shopper can retry.
    #[error("Could not reach the store, please try again")]
    Transport(String),
}

impl From<GatewayError> for CheckoutError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected { code, message, .. } => CheckoutError::Rejected { code, message },
            GatewayError::Transport(reason) => CheckoutError::Transport(reason),
        }
    }
}

/// General client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cart(#[from] CoreError),
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

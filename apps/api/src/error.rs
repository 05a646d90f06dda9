//! # API Error Type
//!
//! Every handler returns [`ApiResult`]. Errors leave the server as
//!
//! ```text
//! HTTP 400  { "code": "TOTAL_MISMATCH", "message": "Total does not match with amount (...)" }
//! ```
//!
//! ## Status Mapping
//! ```text
//! VALIDATION_ERROR, PRODUCT_NOT_FOUND, TOTAL_MISMATCH   → 400
//! UNAUTHENTICATED, INVALID_CREDENTIALS                  → 401
//! FORBIDDEN                                             → 403
//! NOT_FOUND                                             → 404
//! DUPLICATE, ORDER_ALREADY_PAID                         → 409
//! INTERNAL_ERROR                                        → 500 (details only in logs)
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use teslo_core::{CoreError, ValidationError};
use teslo_db::DbError;

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ProductNotFound,
    TotalMismatch,
    Unauthenticated,
    InvalidCredentials,
    Forbidden,
    NotFound,
    Duplicate,
    OrderAlreadyPaid,
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::ProductNotFound | ErrorCode::TotalMismatch => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::Unauthenticated | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Duplicate | ErrorCode::OrderAlreadyPaid => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An error on its way to the client.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, CoreError::Unauthenticated.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found", what))
    }

    /// Logs `detail` and hides it from the client.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Internal error");
        Self::new(ErrorCode::InternalError, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.code != ErrorCode::InternalError {
            tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
        }
        (self.status(), Json(self)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::TotalMismatch { .. } => ErrorCode::TotalMismatch,
            CoreError::Unauthenticated => ErrorCode::Unauthenticated,
            CoreError::OrderAlreadyPaid(_) => ErrorCode::OrderAlreadyPaid,
            CoreError::Validation(inner) => return ApiError::validation(inner.to_string()),
            CoreError::LineItemNotFound { .. }
            | CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::AmountOverflow => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { entity, .. } => ApiError::not_found(entity),
            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::Duplicate, err.to_string()),
            DbError::ForeignKeyViolation { .. } => ApiError::validation(err.to_string()),
            _ => ApiError::internal(&err),
        }
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

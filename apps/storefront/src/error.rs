//! API error type.
//!
//! Every handler returns `ApiResult<T>`. Errors render as
//! `{"code": "...", "message": "..."}` with a status derived from the code:
//!
//! | code               | status |
//! |--------------------|--------|
//! | `NOT_FOUND`        | 404    |
//! | `VALIDATION_ERROR` | 400    |
//! | `BUSINESS_LOGIC`   | 422    |
//! | `CONFLICT`         | 409    |
//! | `PAYMENT_ERROR`    | 502    |
//! | `DATABASE_ERROR`   | 500    |
//! | `INTERNAL`         | 500    |
//!
//! Server-side failures are logged with their details; clients only see a
//! generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use electroshop_core::{CoreError, ValidationError};
use electroshop_db::DbError;

use crate::services::payment::PaymentError;

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// A well-formed request the current state does not allow.
    #[error("{0}")]
    BusinessLogic(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Payment processor error: {0}")]
    Payment(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

impl ApiError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BusinessLogic(_) => "BUSINESS_LOGIC",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Payment(_) => "PAYMENT_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BusinessLogic(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Payment(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::Payment(_) => "Payment could not be initiated, please try again".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let message = self.public_message();
        let body = ErrorBody {
            code: self.code(),
            message: &message,
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::Conflict(message) => ApiError::Conflict(message),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::Validation("Referenced record does not exist".to_string())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::OrderNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::InvalidStatusTransition { .. } | CoreError::InvalidPaymentTransition { .. } => {
                ApiError::BusinessLogic(err.to_string())
            }
            CoreError::Validation(inner) => ApiError::Validation(inner.to_string()),
            CoreError::OutOfStock { .. }
            | CoreError::CartTooLarge { .. }
            | CoreError::CartSnapshotTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::EmptyCart
            | CoreError::InvalidPaymentAmount { .. } => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidAmount(_) => ApiError::Validation(err.to_string()),
            other => ApiError::Payment(other.to_string()),
        }
    }
}

//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in VanLedger                              │
//! │                                                                         │
//! │  Handler ── Result<Json<T>, ApiError>                                   │
//! │     │                                                                   │
//! │     ├─ ValidationError / CoreError ──► 400 VALIDATION_ERROR            │
//! │     ├─ DbError::NotFound ────────────► 404 NOT_FOUND                   │
//! │     ├─ duplicate name / phone ───────► 409 CONFLICT                    │
//! │     ├─ InsufficientStock ────────────► 422 INSUFFICIENT_STOCK          │
//! │     ├─ Overpayment ──────────────────► 422 OVERPAYMENT                 │
//! │     ├─ bad / missing token ──────────► 401 UNAUTHORIZED                │
//! │     └─ anything else ────────────────► 500 INTERNAL (logged, masked)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client receives:
//! ```json
//! { "code": "NOT_FOUND", "message": "Shop not found: 1c0f..." }
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vanledger_core::{CoreError, ValidationError};
use vanledger_db::DbError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or invalid credentials (401)
    Unauthorized,

    /// Resource not found, or owned by another tenant (404)
    NotFound,

    /// Duplicate product name or phone number (409)
    Conflict,

    /// Input validation failed (400)
    ValidationError,

    /// Stock would go negative under the reject policy (422)
    InsufficientStock,

    /// Payment exceeds the balance under the reject policy (422)
    Overpayment,

    /// Database unavailable (503)
    Unavailable,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock | ErrorCode::Overpayment => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Logs the real cause and returns a generic message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Internal error");
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::AmountOverflow { .. } => return ApiError::internal(err),
            CoreError::DuplicateProduct { .. } | CoreError::DuplicatePhone { .. } => ErrorCode::Conflict,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::Overpayment { .. } => ErrorCode::Overpayment,
            CoreError::InvalidOrderStatus { .. }
            | CoreError::MissingPaymentInfo
            | CoreError::TotalsMismatch { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            DbError::Domain(core) => core.into(),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(%message, "Foreign key violation");
                ApiError::validation("Invalid reference")
            }
            DbError::PoolExhausted | DbError::ConnectionFailed(_) => {
                tracing::error!(error = %err, "Database unavailable");
                ApiError::new(ErrorCode::Unavailable, "Database unavailable")
            }
            DbError::MigrationFailed(_) | DbError::QueryFailed(_) | DbError::Internal(_) => {
                ApiError::internal(err)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

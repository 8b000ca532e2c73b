//! # Error Types
//!
//! Domain-specific error types for vanledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vanledger-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vanledger-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, NotFound, wraps CoreError    │
//! │                                                                         │
//! │  Server errors (apps/server)                                           │
//! │  └── ApiError         - What clients see ({code, message} + status)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Not found" is not a core error: only storage knows whether a record
//! exists for the caller's tenant.

use thiserror::Error;

use crate::money::Money;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product with the same name (ignoring case) already exists for the
    /// tenant.
    ///
    /// ## When This Occurs
    /// - Creating "pepsi" when "Pepsi" is already in the catalog
    #[error("Product '{name}' already exists")]
    DuplicateProduct { name: String },

    /// Phone number is already registered.
    #[error("Phone number {phone} is already registered")]
    DuplicatePhone { phone: String },

    /// The order is not in a state that allows the requested transition.
    ///
    /// ## When This Occurs
    /// ```text
    /// Order (delivered)
    ///      │
    ///      ▼
    /// cancel requested
    ///      │
    ///      ▼
    /// InvalidOrderStatus { current: Delivered, requested: Cancelled }
    ///      │
    ///      ▼
    /// Order unchanged, no sale re-recorded
    /// ```
    #[error("Order {order_id} is {current}, cannot move to {requested}")]
    InvalidOrderStatus {
        order_id: String,
        current: OrderStatus,
        requested: OrderStatus,
    },

    /// Delivering an order without saying how it was paid.
    #[error("Payment info is required to deliver an order")]
    MissingPaymentInfo,

    /// Client-supplied totals disagree with the server's arithmetic.
    #[error("{field} mismatch: submitted {submitted}, computed {computed}")]
    TotalsMismatch {
        field: &'static str,
        submitted: Money,
        computed: Money,
    },

    /// Stock would go below zero under the reject policy.
    ///
    /// ## When This Occurs
    /// - Two vans sell the last units concurrently; the second commit fails
    /// - Wastage larger than the units on hand
    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock { product_id: String, requested: i64 },

    /// Payment larger than the shop's outstanding balance under the reject
    /// policy.
    #[error("Payment {amount} exceeds pending balance of shop {shop_id}")]
    Overpayment { shop_id: String, amount: Money },

    /// A report figure does not fit in the money type.
    #[error("{field} is too large to compute")]
    AmountOverflow { field: &'static str },

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
/// Used for early validation before any write happens.
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

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value exceeds another value it is bounded by.
    #[error("{field} must not exceed {limit}")]
    Exceeds { field: String, limit: String },

    /// Invalid format (e.g., bad phone number, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # vanledger-core: Pure Business Logic for VanLedger
//!
//! This crate holds every bookkeeping rule of VanLedger as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        VanLedger Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/server)                       │   │
//! │  │    /sales ──► /payments ──► /orders/{id} ──► /summary           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vanledger-db                                 │   │
//! │  │    transactions, balance/stock ledgers, tenant-scoped repos     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ vanledger-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │  money  │  │ billing │  │ finance │  │  order  │           │   │
//! │  │   │  Money  │  │  Bill   │  │ paid()  │  │ pending │           │   │
//! │  │   │ (paise) │  │ settle  │  │ credit()│  │ ──► ... │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Shop, Product, Sale, Order, ...)
//! - [`money`] - Money type with integer paise (no floating point!)
//! - [`tenant`] - Tenant identifier threaded through every operation
//! - [`billing`] - Server-side bill totals and payment settlement
//! - [`finance`] - Paid/credit derivation and period aggregation
//! - [`order`] - Take-order state machine
//! - [`period`] - Business-day report ranges
//! - [`policy`] - Stock floor and overpayment policies
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vanledger_core::billing::Bill;
//! use vanledger_core::{LineItem, Money, PaymentType};
//!
//! let items = vec![LineItem::new("milk", 10, Money::from_paise(10_000))];
//! let bill = Bill::price(items, Money::zero(), None, None).unwrap();
//!
//! // Cash sale, partly paid: the rest becomes credit on the shop
//! let settled = bill.settle(Some(Money::from_paise(60_000)), PaymentType::Cash).unwrap();
//! assert_eq!(settled.credit(), Money::from_paise(40_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod finance;
pub mod money;
pub mod order;
pub mod period;
pub mod policy;
pub mod tenant;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::{OverpaymentPolicy, Policies, StockPolicy};
pub use tenant::TenantId;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items on a single sale or order.
///
/// ## Business Reason
/// A van round rarely carries more than a few dozen products; a larger bill
/// is almost always a client bug resubmitting the same cart.
pub const MAX_BILL_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 100)
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Largest single amount accepted anywhere (₹1,000 crore, in paise).
///
/// Sums of many capped amounts stay far inside `i64`, so ledger columns and
/// report totals cannot overflow on accepted input.
pub const MAX_AMOUNT: Money = Money::from_paise(1_000_000_000_000);

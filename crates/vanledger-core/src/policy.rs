//! # Ledger Policies
//!
//! Two business choices are left to the operator instead of being hardcoded:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockPolicy                                                            │
//! │    allow_negative  stock may dip below zero (van sold goods it had     │
//! │                    but nobody logged the morning load)                  │
//! │    reject          the decrement is conditional; a sale or wastage     │
//! │                    that would go below zero fails the whole operation  │
//! │                                                                         │
//! │  OverpaymentPolicy                                                      │
//! │    allow           pending balance may go negative (tenant owes shop)  │
//! │    reject          payment larger than the balance fails               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Defaults keep the permissive behaviour.

use serde::{Deserialize, Serialize};

/// What happens when a decrement would take stock below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    #[default]
    AllowNegative,
    Reject,
}

/// What happens when a payment exceeds the shop's pending balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    #[default]
    Allow,
    Reject,
}

/// The policies a ledger write consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policies {
    #[serde(default)]
    pub stock: StockPolicy,
    #[serde(default)]
    pub overpayment: OverpaymentPolicy,
}

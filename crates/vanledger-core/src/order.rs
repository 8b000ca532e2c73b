//! # Order State Machine
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Take-Order Lifecycle                                │
//! │                                                                         │
//! │                 ┌───────────┐                                           │
//! │   create ─────► │  pending  │                                           │
//! │                 └─────┬─────┘                                           │
//! │           deliver     │      cancel                                     │
//! │   (payment info) ┌────┴────┐                                            │
//! │                  ▼         ▼                                            │
//! │          ┌───────────┐ ┌───────────┐                                    │
//! │          │ delivered │ │ cancelled │      both terminal                 │
//! │          └───────────┘ └───────────┘                                    │
//! │                                                                         │
//! │  deliver = record a sale for the order's bill, set sale_id, set status  │
//! │            (one transaction, in vanledger-db)                           │
//! │  cancel  = status flag only                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only decides whether a transition is allowed and what it
//! needs; the storage layer carries it out.

use crate::billing::{Bill, SettledBill};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Order, OrderStatus, PaymentInfo};

/// An allowed transition out of `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Deliver and record a sale paid as described.
    Deliver(PaymentInfo),
    /// Cancel without side effects.
    Cancel,
}

/// Decides the transition for a status update request.
///
/// ## Errors
/// - `requested == pending`: not a transition (`ValidationError`)
/// - current status is terminal: [`CoreError::InvalidOrderStatus`]
/// - delivering without payment info: [`CoreError::MissingPaymentInfo`]
pub fn plan_transition(
    order: &Order,
    requested: OrderStatus,
    payment_info: Option<PaymentInfo>,
) -> CoreResult<Transition> {
    let deliver = match requested {
        OrderStatus::Delivered => true,
        OrderStatus::Cancelled => false,
        OrderStatus::Pending => {
            return Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec![
                    OrderStatus::Delivered.to_string(),
                    OrderStatus::Cancelled.to_string(),
                ],
            }
            .into())
        }
    };

    if order.status.is_terminal() {
        return Err(CoreError::InvalidOrderStatus {
            order_id: order.id.clone(),
            current: order.status,
            requested,
        });
    }

    if deliver {
        payment_info
            .map(Transition::Deliver)
            .ok_or(CoreError::MissingPaymentInfo)
    } else {
        Ok(Transition::Cancel)
    }
}

/// Rebuilds the order's bill and settles it with the delivery payment.
///
/// The stored totals were checked when the order was taken; they are
/// re-checked here so a corrupted row cannot produce a wrong sale.
pub fn settle_delivery(order: &Order, payment: PaymentInfo) -> CoreResult<SettledBill> {
    Bill::price(
        order.items.clone(),
        order.discount,
        Some(order.subtotal),
        Some(order.total_amount),
    )?
    .settle(Some(payment.amount_paid), payment.payment_type)
}

// =============================================================================
// Unit Tests
// =============================================================================

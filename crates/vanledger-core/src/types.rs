//! # Domain Types
//!
//! Core domain types used throughout VanLedger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Shop       │   │      Sale       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  shop_id        │   │  shop_id        │       │
//! │  │  name, area     │   │  items[]        │◄──│  sale_id?       │       │
//! │  │  pending_balance│   │  total_amount   │   │  status         │       │
//! │  └─────────────────┘   │  amount_paid?   │   │  delivery_date  │       │
//! │          ▲             │  payment_type   │   └─────────────────┘       │
//! │          │             └─────────────────┘                              │
//! │  ┌───────┴─────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PaymentLog    │   │    Product      │◄──│    StockLog     │       │
//! │  │  shop_id        │   │  price, stock   │   │  morning/wastage│       │
//! │  │  amount         │   └─────────────────┘   │  /sales         │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  Every entity carries owner_id: the tenant it belongs to.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Aggregates
//! `Shop.pending_balance` and `Product.stock` are running totals kept in
//! storage. They change only through the balance and stock ledgers in
//! vanledger-db, never through a plain field update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Payment Type
// =============================================================================

/// How the shop settled a sale at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Physical cash; counts towards the cash-in-hand reconciliation.
    Cash,
    /// UPI transfer straight to the tenant's account.
    Upi,
    /// Nothing collected now; the full total goes on the shop's tab.
    Credit,
}

impl PaymentType {
    /// Lowercase name as stored and serialized.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Upi => "upi",
            PaymentType::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Stock Log Type
// =============================================================================

/// Kind of stock movement recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockLogType {
    /// Morning load-out count. Audit only, stock is not changed.
    Morning,
    /// Spoiled or lost goods. Decrements stock.
    Wastage,
    /// Written by sale recording for each sold line.
    Sales,
}

impl StockLogType {
    /// Whether recording this event moves `Product.stock`.
    pub const fn decrements_stock(&self) -> bool {
        matches!(self, StockLogType::Wastage)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StockLogType::Morning => "morning",
            StockLogType::Wastage => "wastage",
            StockLogType::Sales => "sales",
        }
    }
}

impl fmt::Display for StockLogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of a take-order. See [`crate::order`] for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Taken, awaiting delivery.
    #[default]
    Pending,
    /// Delivered; a sale was recorded for it.
    Delivered,
    /// Called off before delivery.
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states accept no further transitions.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account. Its id is the tenant id of everything it creates.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Login identifier, unique across all tenants.
    pub phone: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Shop
// =============================================================================

/// A retail outlet on the van's route.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub area: String,
    /// Outstanding credit: Σ sale credit − Σ payments. Ledger-maintained.
    pub pending_balance: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product the van carries.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub owner_id: String,
    /// Unique per tenant, compared case-insensitively at creation.
    pub name: String,
    /// Selling unit shown on bills ("packet", "kg", "crate").
    pub unit: String,
    /// List price per unit. Bills may carry a negotiated price per line.
    pub price: Money,
    /// Units on hand. Ledger-maintained; may be negative under the
    /// permissive stock policy.
    pub stock: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a sale or order: quantity at a per-unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price charged on this bill.
    pub price: Money,
    /// Joined in on reads. `None` once the product is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[cfg_attr(feature = "sqlx", sqlx(default))]
    pub product_name: Option<String>,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: i64, price: Money) -> Self {
        LineItem {
            product_id: product_id.into(),
            quantity,
            price,
            product_name: None,
        }
    }

    /// `price × quantity`, or `None` if it overflows.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub owner_id: String,
    pub shop_id: String,
    /// Joined in on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[cfg_attr(feature = "sqlx", sqlx(default))]
    pub shop_name: Option<String>,
    /// Loaded from `sale_items` separately.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total_amount: Money,
    /// `None` only on rows written before the field existed;
    /// see [`crate::finance::paid`] for the fallback.
    pub amount_paid: Option<Money>,
    pub payment_type: PaymentType,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

// =============================================================================
// Expense
// =============================================================================

/// Money spent on the round (fuel, loading charges, ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub owner_id: String,
    pub description: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

// =============================================================================
// Payment Log
// =============================================================================

/// Money received from a shop against its outstanding credit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLog {
    pub id: String,
    pub owner_id: String,
    pub shop_id: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

// =============================================================================
// Stock Log
// =============================================================================

/// Append-only stock audit row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLog {
    pub id: String,
    pub owner_id: String,
    pub product_id: String,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub log_type: StockLogType,
    pub note: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// A take-order awaiting delivery.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub owner_id: String,
    pub shop_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[cfg_attr(feature = "sqlx", sqlx(default))]
    pub shop_name: Option<String>,
    /// Loaded from `order_items` separately.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total_amount: Money,
    pub status: OrderStatus,
    /// Set exactly once, on delivery.
    pub sale_id: Option<String>,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub delivery_date: NaiveDate,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Inputs
// =============================================================================
// Request payloads. Totals on bills are optional: when present they are
// checked against the server-side recomputation.

/// Payload for registering a shop.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewShop {
    pub name: String,
    pub area: String,
}

/// Partial shop update. The balance is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShopUpdate {
    pub name: Option<String>,
    pub area: Option<String>,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub price: Money,
    /// Opening stock, defaults to 0.
    #[serde(default)]
    pub stock: i64,
}

/// Partial product update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price: Option<Money>,
    /// Stock count correction after a physical recount.
    pub stock: Option<i64>,
}

/// Payload for recording a sale at the counter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub shop_id: String,
    pub items: Vec<LineItem>,
    /// Client-side subtotal, checked if present.
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub discount: Money,
    /// Client-side total, checked if present.
    #[serde(default)]
    pub total_amount: Option<Money>,
    /// Defaults to the total for cash/upi and to zero for credit.
    #[serde(default)]
    pub amount_paid: Option<Money>,
    pub payment_type: PaymentType,
}

/// Payload for taking an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub shop_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub total_amount: Option<Money>,
    #[ts(as = "String")]
    pub delivery_date: NaiveDate,
}

/// How a delivered order was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub amount_paid: Money,
    pub payment_type: PaymentType,
}

/// Payload for changing an order's status.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_info: Option<PaymentInfo>,
}

/// Payload for recording money received from a shop.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub shop_id: String,
    pub amount: Money,
}

/// Payload for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
}

/// Payload for recording a stock movement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewStockLog {
    pub product_id: String,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub log_type: StockLogType,
    #[serde(default)]
    pub note: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentType::Upi).unwrap(), "\"upi\"");
        assert_eq!(serde_json::to_string(&StockLogType::Wastage).unwrap(), "\"wastage\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"cancelled\"");
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_only_wastage_moves_stock() {
        assert!(StockLogType::Wastage.decrements_stock());
        assert!(!StockLogType::Morning.decrements_stock());
        assert!(!StockLogType::Sales.decrements_stock());
    }

    #[test]
    fn test_terminal_order_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_sale_draft_accepts_minimal_payload() {
        let json = r#"{
            "shopId": "shop-1",
            "items": [{"productId": "p-1", "quantity": 2, "price": 500}],
            "paymentType": "credit"
        }"#;
        let draft: SaleDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.discount, Money::zero());
        assert!(draft.amount_paid.is_none());
        assert!(draft.total_amount.is_none());
        assert_eq!(draft.items[0].line_total(), Some(Money::from_paise(1000)));
    }

    #[test]
    fn test_stock_log_type_field_name() {
        let json = r#"{"productId": "p-1", "quantity": 3, "type": "wastage"}"#;
        let input: NewStockLog = serde_json::from_str(json).unwrap();
        assert_eq!(input.log_type, StockLogType::Wastage);
        assert!(input.note.is_none());
    }

    #[test]
    fn test_user_hash_is_not_serialized() {
        let user = User {
            id: "u-1".to_string(),
            name: "Ravi".to_string(),
            phone: "9876543210".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["phone"], "9876543210");
    }
}

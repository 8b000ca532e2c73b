//! # Billing
//!
//! Turns a client's bill into server-computed totals and a payment split.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleDraft / OrderDraft (from client)                                  │
//! │       │  items[], discount, subtotal?, totalAmount?                     │
//! │       ▼                                                                 │
//! │  Bill::price  ← recompute subtotal = Σ quantity × price                │
//! │       │         total = subtotal − discount                            │
//! │       │         submitted totals must match (TotalsMismatch)           │
//! │       ▼                                                                 │
//! │  Bill::settle ← amountPaid defaults: cash/upi → total, credit → 0      │
//! │       │         0 ≤ amountPaid ≤ total, credit sales collect nothing   │
//! │       ▼                                                                 │
//! │  SettledBill  ── credit() = total − amountPaid ──► balance ledger      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line prices come from the bill, not the catalog: a van seller quotes
//! each shop its own rate. The catalog price is only the default the web
//! client pre-fills.

use serde::Serialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineItem, OrderDraft, PaymentType, SaleDraft};
use crate::validation::{validate_non_negative, validate_quantity, validate_reference};
use crate::MAX_BILL_ITEMS;

// =============================================================================
// Bill
// =============================================================================

/// A bill whose totals were computed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bill {
    items: Vec<LineItem>,
    subtotal: Money,
    discount: Money,
    total_amount: Money,
}

impl Bill {
    /// Validates line items and computes the totals.
    ///
    /// `submitted_subtotal` / `submitted_total` are what the client displayed;
    /// when present they must equal the computed values.
    ///
    /// ## Example
    /// ```rust
    /// use vanledger_core::billing::Bill;
    /// use vanledger_core::{LineItem, Money};
    ///
    /// let items = vec![
    ///     LineItem::new("bread", 4, Money::from_paise(4_000)),
    ///     LineItem::new("eggs", 2, Money::from_paise(7_000)),
    /// ];
    /// let bill = Bill::price(items, Money::from_paise(1_000), None, None).unwrap();
    /// assert_eq!(bill.subtotal().paise(), 30_000);
    /// assert_eq!(bill.total_amount().paise(), 29_000);
    /// ```
    pub fn price(
        items: Vec<LineItem>,
        discount: Money,
        submitted_subtotal: Option<Money>,
        submitted_total: Option<Money>,
    ) -> CoreResult<Bill> {
        if items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        if items.len() > MAX_BILL_ITEMS {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_BILL_ITEMS as i64,
            }
            .into());
        }

        let mut subtotal = Money::zero();
        for item in &items {
            validate_reference("productId", &item.product_id)?;
            validate_quantity(item.quantity)?;
            validate_non_negative("price", item.price)?;

            subtotal = item
                .line_total()
                .and_then(|line| subtotal.checked_add(line))
                .ok_or_else(|| ValidationError::InvalidFormat {
                    field: "items".to_string(),
                    reason: "bill total is too large".to_string(),
                })?;
        }

        validate_non_negative("subtotal", subtotal)?;
        validate_non_negative("discount", discount)?;
        if discount > subtotal {
            return Err(ValidationError::Exceeds {
                field: "discount".to_string(),
                limit: subtotal.to_string(),
            }
            .into());
        }

        let total_amount = subtotal - discount;

        check_submitted("subtotal", submitted_subtotal, subtotal)?;
        check_submitted("totalAmount", submitted_total, total_amount)?;

        Ok(Bill {
            items,
            subtotal,
            discount,
            total_amount,
        })
    }

    /// Decides how much was collected and how much goes on credit.
    ///
    /// ## Rules
    /// ```text
    /// amountPaid omitted ──► cash/upi: total    credit: 0
    /// amountPaid < 0      ──► ValidationError
    /// amountPaid > total  ──► ValidationError
    /// credit with paid>0  ──► ValidationError
    /// ```
    pub fn settle(self, amount_paid: Option<Money>, payment_type: PaymentType) -> CoreResult<SettledBill> {
        let amount_paid = amount_paid.unwrap_or(match payment_type {
            PaymentType::Credit => Money::zero(),
            PaymentType::Cash | PaymentType::Upi => self.total_amount,
        });

        validate_non_negative("amountPaid", amount_paid)?;

        if amount_paid > self.total_amount {
            return Err(ValidationError::Exceeds {
                field: "amountPaid".to_string(),
                limit: self.total_amount.to_string(),
            }
            .into());
        }

        if payment_type == PaymentType::Credit && amount_paid.is_positive() {
            return Err(ValidationError::Exceeds {
                field: "amountPaid".to_string(),
                limit: format!("{} for credit sales", Money::zero()),
            }
            .into());
        }

        Ok(SettledBill {
            bill: self,
            amount_paid,
            payment_type,
        })
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }
}

fn check_submitted(field: &'static str, submitted: Option<Money>, computed: Money) -> CoreResult<()> {
    match submitted {
        Some(submitted) if submitted != computed => Err(CoreError::TotalsMismatch {
            field,
            submitted,
            computed,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Settled Bill
// =============================================================================

/// A priced bill plus how it was paid. Input to sale recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettledBill {
    bill: Bill,
    amount_paid: Money,
    payment_type: PaymentType,
}

impl SettledBill {
    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    /// Unpaid residual added to the shop's pending balance. Never negative.
    pub fn credit(&self) -> Money {
        self.bill.total_amount - self.amount_paid
    }
}

// =============================================================================
// Draft Helpers
// =============================================================================

/// Prices and settles a counter sale.
pub fn settle_sale(draft: &SaleDraft) -> CoreResult<SettledBill> {
    validate_reference("shopId", &draft.shop_id)?;
    Bill::price(
        draft.items.clone(),
        draft.discount,
        draft.subtotal,
        draft.total_amount,
    )?
    .settle(draft.amount_paid, draft.payment_type)
}

/// Prices a take-order. Payment is settled later, on delivery.
pub fn price_order(draft: &OrderDraft) -> CoreResult<Bill> {
    validate_reference("shopId", &draft.shop_id)?;
    Bill::price(
        draft.items.clone(),
        draft.discount,
        draft.subtotal,
        draft.total_amount,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_AMOUNT;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem::new("milk", 10, Money::from_paise(5_000)),
            LineItem::new("curd", 5, Money::from_paise(10_000)),
        ]
    }

    #[test]
    fn test_price_recomputes_totals() {
        let bill = Bill::price(items(), Money::from_paise(500), None, None).unwrap();
        assert_eq!(bill.subtotal(), Money::from_paise(100_000));
        assert_eq!(bill.total_amount(), Money::from_paise(99_500));
        assert_eq!(bill.items().len(), 2);
    }

    #[test]
    fn test_matching_submitted_totals_are_accepted() {
        let bill = Bill::price(
            items(),
            Money::zero(),
            Some(Money::from_paise(100_000)),
            Some(Money::from_paise(100_000)),
        );
        assert!(bill.is_ok());
    }

    #[test]
    fn test_tampered_total_is_rejected() {
        let err = Bill::price(items(), Money::zero(), None, Some(Money::from_paise(10_000))).unwrap_err();
        assert!(matches!(
            err,
            CoreError::TotalsMismatch { field: "totalAmount", .. }
        ));

        let err = Bill::price(items(), Money::zero(), Some(Money::from_paise(1)), None).unwrap_err();
        assert!(matches!(err, CoreError::TotalsMismatch { field: "subtotal", .. }));
    }

    #[test]
    fn test_invalid_lines_are_rejected() {
        assert!(Bill::price(Vec::new(), Money::zero(), None, None).is_err());

        let zero_qty = vec![LineItem::new("milk", 0, Money::from_paise(100))];
        assert!(Bill::price(zero_qty, Money::zero(), None, None).is_err());

        let negative_price = vec![LineItem::new("milk", 1, Money::from_paise(-100))];
        assert!(Bill::price(negative_price, Money::zero(), None, None).is_err());

        let blank_product = vec![LineItem::new("  ", 1, Money::from_paise(100))];
        assert!(Bill::price(blank_product, Money::zero(), None, None).is_err());

        let too_many = vec![LineItem::new("milk", 1, Money::from_paise(1)); MAX_BILL_ITEMS + 1];
        assert!(Bill::price(too_many, Money::zero(), None, None).is_err());
    }

    #[test]
    fn test_oversized_bill_is_rejected() {
        let huge = vec![LineItem::new("gold", 2, Money::from_paise(i64::MAX / 2 + 1))];
        assert!(matches!(
            Bill::price(huge, Money::zero(), None, None),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        // Each line is within the cap, the bill is not
        let lines = vec![LineItem::new("gold", 2, MAX_AMOUNT)];
        match Bill::price(lines, Money::zero(), None, None) {
            Err(CoreError::Validation(ValidationError::OutOfRange { field, .. })) => {
                assert_eq!(field, "subtotal")
            }
            other => panic!("expected subtotal cap, got {other:?}"),
        }

        let at_cap = vec![LineItem::new("gold", 1, MAX_AMOUNT)];
        assert!(Bill::price(at_cap, Money::zero(), None, None).is_ok());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(Bill::price(items(), Money::from_paise(-1), None, None).is_err());
        assert!(Bill::price(items(), Money::from_paise(100_001), None, None).is_err());

        let free = Bill::price(items(), Money::from_paise(100_000), None, None).unwrap();
        assert_eq!(free.total_amount(), Money::zero());
    }

    #[test]
    fn test_settle_defaults_amount_paid() {
        let bill = Bill::price(items(), Money::zero(), None, None).unwrap();

        let cash = bill.clone().settle(None, PaymentType::Cash).unwrap();
        assert_eq!(cash.amount_paid(), Money::from_paise(100_000));
        assert_eq!(cash.credit(), Money::zero());

        let credit = bill.settle(None, PaymentType::Credit).unwrap();
        assert_eq!(credit.amount_paid(), Money::zero());
        assert_eq!(credit.credit(), Money::from_paise(100_000));
    }

    #[test]
    fn test_partial_cash_payment_leaves_credit() {
        let bill = Bill::price(items(), Money::zero(), None, None).unwrap();
        let settled = bill.settle(Some(Money::from_paise(60_000)), PaymentType::Cash).unwrap();
        assert_eq!(settled.credit(), Money::from_paise(40_000));
        assert_eq!(settled.amount_paid() + settled.credit(), settled.bill().total_amount());
    }

    #[test]
    fn test_settle_rejects_bad_amounts() {
        let bill = Bill::price(items(), Money::zero(), None, None).unwrap();

        assert!(bill.clone().settle(Some(Money::from_paise(-1)), PaymentType::Cash).is_err());
        assert!(bill.clone().settle(Some(Money::from_paise(100_001)), PaymentType::Upi).is_err());
        assert!(bill.clone().settle(Some(Money::from_paise(1)), PaymentType::Credit).is_err());
        assert!(bill.settle(Some(Money::zero()), PaymentType::Credit).is_ok());
    }

    #[test]
    fn test_settle_sale_draft() {
        let draft = SaleDraft {
            shop_id: "shop-a".to_string(),
            items: items(),
            subtotal: Some(Money::from_paise(100_000)),
            discount: Money::zero(),
            total_amount: Some(Money::from_paise(100_000)),
            amount_paid: Some(Money::from_paise(60_000)),
            payment_type: PaymentType::Cash,
        };
        let settled = settle_sale(&draft).unwrap();
        assert_eq!(settled.credit(), Money::from_paise(40_000));

        let no_shop = SaleDraft {
            shop_id: String::new(),
            ..draft
        };
        assert!(settle_sale(&no_shop).is_err());
    }
}

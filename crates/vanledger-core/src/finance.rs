//! # Financial Derivation
//!
//! Pure functions deriving paid/credit figures from sales and aggregating a
//! period of activity into the numbers on the analytics and daily-closing
//! screens.
//!
//! ## Per-Sale Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  paid(s)   = s.amount_paid            if recorded                       │
//! │            = 0                        if legacy row and credit sale     │
//! │            = s.total_amount           if legacy row and cash/upi        │
//! │                                                                         │
//! │  credit(s) = s.total_amount − paid(s)                                   │
//! │            (negative ⇒ malformed row: shown as 0, reported as anomaly) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Period Figures
//! ```text
//! cash_total           = Σ paid(s)   where payment_type = cash
//! upi_total            = Σ paid(s)   where payment_type = upi
//! credit_total         = Σ credit(s) over ALL sales (underpaid cash counts)
//! revenue              = cash_total + upi_total + credit_total
//! expense_total        = Σ expense.amount
//! old_credit_recovered = Σ payment.amount
//! net_profit           = revenue − expense_total
//! cash_expected        = cash_total − expense_total + old_credit_recovered
//! ```
//! `cash_expected` is the cash the seller should hand over at day end; it
//! leaves out UPI and anything still on credit.

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Expense, PaymentLog, PaymentType, Sale};

// =============================================================================
// Per-Sale Derivation
// =============================================================================

/// Amount collected at the time of sale.
///
/// ## Example
/// ```rust
/// # use chrono::Utc;
/// # use vanledger_core::{Money, PaymentType, Sale};
/// # let sale = Sale {
/// #     id: "s".into(), owner_id: "t".into(), shop_id: "shop".into(), shop_name: None,
/// #     items: vec![],
/// #     subtotal: Money::from_paise(1000), discount: Money::zero(),
/// #     total_amount: Money::from_paise(1000), amount_paid: None,
/// #     payment_type: PaymentType::Credit, date: Utc::now(),
/// # };
/// use vanledger_core::finance::paid;
///
/// // A legacy credit row without amount_paid collected nothing
/// assert_eq!(paid(&sale), Money::zero());
/// ```
pub fn paid(sale: &Sale) -> Money {
    match sale.amount_paid {
        Some(amount) => amount,
        None => match sale.payment_type {
            PaymentType::Credit => Money::zero(),
            PaymentType::Cash | PaymentType::Upi => sale.total_amount,
        },
    }
}

/// Credit extended on a sale as stored, which may be negative for a
/// malformed row.
pub fn raw_credit(sale: &Sale) -> Money {
    sale.total_amount - paid(sale)
}

/// Credit extended on a sale, clamped at zero for display.
pub fn credit(sale: &Sale) -> Money {
    raw_credit(sale).floor_zero()
}

// =============================================================================
// Period Totals
// =============================================================================

/// A sale whose recorded payment exceeds its total.
///
/// Storage is never rewritten; the reporting layer logs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditAnomaly {
    pub sale_id: String,
    /// `total_amount − paid`, negative.
    pub derived_credit: Money,
}

/// Aggregated figures for a report period (the analytics screen).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub cash_total: Money,
    pub upi_total: Money,
    pub credit_total: Money,
    pub revenue: Money,
    pub expense_total: Money,
    pub old_credit_recovered: Money,
    pub net_profit: Money,
    pub cash_expected: Money,
    pub sales_count: usize,
    pub expenses_count: usize,
    pub payments_count: usize,
    #[serde(skip)]
    #[ts(skip)]
    pub anomalies: Vec<CreditAnomaly>,
}

impl PeriodTotals {
    /// Aggregates one period's sales, expenses and credit payments.
    ///
    /// ## Errors
    /// [`CoreError::AmountOverflow`] if a figure leaves the `i64` range.
    /// Amounts are capped at input, so this only fires on corrupt rows.
    pub fn compute(
        sales: &[Sale],
        expenses: &[Expense],
        payments: &[PaymentLog],
    ) -> CoreResult<Self> {
        let mut totals = PeriodTotals::default();

        for sale in sales {
            let collected = paid(sale);
            match sale.payment_type {
                PaymentType::Cash => {
                    totals.cash_total = add("cashTotal", totals.cash_total, collected)?
                }
                PaymentType::Upi => totals.upi_total = add("upiTotal", totals.upi_total, collected)?,
                PaymentType::Credit => {}
            }

            let derived = sale
                .total_amount
                .checked_sub(collected)
                .ok_or(CoreError::AmountOverflow { field: "creditTotal" })?;
            if derived.is_negative() {
                totals.anomalies.push(CreditAnomaly {
                    sale_id: sale.id.clone(),
                    derived_credit: derived,
                });
            }
            totals.credit_total = add("creditTotal", totals.credit_total, derived.floor_zero())?;
        }

        for expense in expenses {
            totals.expense_total = add("expenseTotal", totals.expense_total, expense.amount)?;
        }
        for payment in payments {
            totals.old_credit_recovered =
                add("oldCreditRecovered", totals.old_credit_recovered, payment.amount)?;
        }

        totals.revenue = add(
            "revenue",
            add("revenue", totals.cash_total, totals.upi_total)?,
            totals.credit_total,
        )?;
        totals.net_profit = sub("netProfit", totals.revenue, totals.expense_total)?;
        totals.cash_expected = add(
            "cashExpected",
            sub("cashExpected", totals.cash_total, totals.expense_total)?,
            totals.old_credit_recovered,
        )?;

        totals.sales_count = sales.len();
        totals.expenses_count = expenses.len();
        totals.payments_count = payments.len();

        Ok(totals)
    }
}

fn add(field: &'static str, a: Money, b: Money) -> CoreResult<Money> {
    a.checked_add(b).ok_or(CoreError::AmountOverflow { field })
}

fn sub(field: &'static str, a: Money, b: Money) -> CoreResult<Money> {
    a.checked_sub(b).ok_or(CoreError::AmountOverflow { field })
}

/// Daily closing: period totals plus current outstanding credit.
///
/// `total_pending_credits` is a point-in-time read of every shop's balance
/// and does not reconcile with the period's `credit_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(flatten)]
    pub totals: PeriodTotals,
    pub total_pending_credits: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sale(id: &str, total: i64, paid: Option<i64>, payment_type: PaymentType) -> Sale {
        Sale {
            id: id.to_string(),
            owner_id: "tenant".to_string(),
            shop_id: "shop".to_string(),
            shop_name: None,
            items: Vec::new(),
            subtotal: Money::from_paise(total),
            discount: Money::zero(),
            total_amount: Money::from_paise(total),
            amount_paid: paid.map(Money::from_paise),
            payment_type,
            date: Utc::now(),
        }
    }

    fn expense(amount: i64) -> Expense {
        Expense {
            id: "e".to_string(),
            owner_id: "tenant".to_string(),
            description: "fuel".to_string(),
            amount: Money::from_paise(amount),
            date: Utc::now(),
        }
    }

    fn payment(amount: i64) -> PaymentLog {
        PaymentLog {
            id: "p".to_string(),
            owner_id: "tenant".to_string(),
            shop_id: "shop".to_string(),
            amount: Money::from_paise(amount),
            date: Utc::now(),
        }
    }

    #[test]
    fn test_paid_uses_recorded_amount() {
        let s = sale("s1", 1000, Some(600), PaymentType::Cash);
        assert_eq!(paid(&s), Money::from_paise(600));
        assert_eq!(credit(&s), Money::from_paise(400));
    }

    #[test]
    fn test_legacy_rows_fall_back_on_payment_type() {
        let cash = sale("s1", 1000, None, PaymentType::Cash);
        assert_eq!(paid(&cash), Money::from_paise(1000));
        assert_eq!(credit(&cash), Money::zero());

        let upi = sale("s2", 700, None, PaymentType::Upi);
        assert_eq!(paid(&upi), Money::from_paise(700));

        let on_credit = sale("s3", 1000, None, PaymentType::Credit);
        assert_eq!(paid(&on_credit), Money::zero());
        assert_eq!(credit(&on_credit), Money::from_paise(1000));
    }

    #[test]
    fn test_paid_plus_credit_is_total() {
        let cases = [
            sale("a", 1000, Some(0), PaymentType::Credit),
            sale("b", 1000, Some(1000), PaymentType::Upi),
            sale("c", 1000, Some(250), PaymentType::Cash),
            sale("d", 0, None, PaymentType::Cash),
        ];
        for s in &cases {
            assert_eq!(paid(s) + credit(s), s.total_amount, "sale {}", s.id);
        }
    }

    #[test]
    fn test_negative_credit_is_clamped_and_reported() {
        let broken = sale("bad", 1000, Some(1200), PaymentType::Cash);
        assert_eq!(raw_credit(&broken), Money::from_paise(-200));
        assert_eq!(credit(&broken), Money::zero());

        let totals = PeriodTotals::compute(&[broken], &[], &[]).unwrap();
        assert_eq!(totals.credit_total, Money::zero());
        assert_eq!(totals.anomalies.len(), 1);
        assert_eq!(totals.anomalies[0].sale_id, "bad");
        assert_eq!(totals.anomalies[0].derived_credit, Money::from_paise(-200));
    }

    #[test]
    fn test_period_totals() {
        let sales = [
            sale("s1", 1000, Some(600), PaymentType::Cash),
            sale("s2", 500, Some(500), PaymentType::Upi),
            sale("s3", 800, Some(0), PaymentType::Credit),
        ];
        let expenses = [expense(150), expense(50)];
        let payments = [payment(300)];

        let totals = PeriodTotals::compute(&sales, &expenses, &payments).unwrap();

        assert_eq!(totals.cash_total, Money::from_paise(600));
        assert_eq!(totals.upi_total, Money::from_paise(500));
        // 400 underpaid cash + 800 credit
        assert_eq!(totals.credit_total, Money::from_paise(1200));
        assert_eq!(totals.revenue, Money::from_paise(2300));
        assert_eq!(totals.expense_total, Money::from_paise(200));
        assert_eq!(totals.old_credit_recovered, Money::from_paise(300));
        assert_eq!(totals.net_profit, Money::from_paise(2100));
        // 600 cash − 200 expenses + 300 recovered
        assert_eq!(totals.cash_expected, Money::from_paise(700));
        assert_eq!(totals.sales_count, 3);
        assert_eq!(totals.expenses_count, 2);
        assert_eq!(totals.payments_count, 1);
        assert!(totals.anomalies.is_empty());
    }

    #[test]
    fn test_oversized_totals_fail_instead_of_wrapping() {
        let half = i64::MAX / 2 + 1;
        let err = PeriodTotals::compute(&[], &[expense(half), expense(half)], &[]).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { field: "expenseTotal" }));

        let sales = [
            sale("s1", half, Some(half), PaymentType::Cash),
            sale("s2", half, Some(half), PaymentType::Cash),
        ];
        assert!(PeriodTotals::compute(&sales, &[], &[]).is_err());
    }

    #[test]
    fn test_empty_period_is_all_zero() {
        let totals = PeriodTotals::compute(&[], &[], &[]).unwrap();
        assert_eq!(totals, PeriodTotals::default());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let sales = [
            sale("s1", 1000, Some(600), PaymentType::Cash),
            sale("s2", 900, None, PaymentType::Credit),
        ];
        let expenses = [expense(100)];
        let first = PeriodTotals::compute(&sales, &expenses, &[]).unwrap();
        let second = PeriodTotals::compute(&sales, &expenses, &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_serializes_flat() {
        let summary = Summary {
            totals: PeriodTotals::compute(&[sale("s1", 1000, Some(600), PaymentType::Cash)], &[], &[]).unwrap(),
            total_pending_credits: Money::from_paise(400),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["cashExpected"], 600);
        assert_eq!(json["totalPendingCredits"], 400);
        assert!(json.get("anomalies").is_none());
    }
}

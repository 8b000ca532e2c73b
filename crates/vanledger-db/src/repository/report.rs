//! # Report Repository
//!
//! Analytics and the daily closing summary. Reads only; the arithmetic lives
//! in `vanledger_core::finance`.

use sqlx::SqlitePool;
use tracing::{debug, warn};
use vanledger_core::finance::{PeriodTotals, Summary};
use vanledger_core::period::ReportPeriod;
use vanledger_core::{Expense, PaymentLog, Sale, TenantId};

use crate::error::DbResult;
use crate::repository::sale::SALE_COLUMNS;
use crate::repository::shop::ShopRepository;

/// Read-only reporting over one tenant's ledgers.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    tenant: TenantId,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId) -> Self {
        ReportRepository { pool, tenant }
    }

    /// Aggregates sales, expenses and credit payments dated inside `period`.
    pub async fn analytics(&self, period: &ReportPeriod) -> DbResult<PeriodTotals> {
        // One read transaction so the three reads see the same snapshot
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE owner_id = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date, id"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(self.tenant.as_str())
            .bind(period.start())
            .bind(period.end())
            .fetch_all(&mut *tx)
            .await?;

        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, owner_id, description, amount, date
            FROM expenses
            WHERE owner_id = ?1 AND date >= ?2 AND date <= ?3
            "#,
        )
        .bind(self.tenant.as_str())
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&mut *tx)
        .await?;

        let payments = sqlx::query_as::<_, PaymentLog>(
            r#"
            SELECT id, owner_id, shop_id, amount, date
            FROM payment_logs
            WHERE owner_id = ?1 AND date >= ?2 AND date <= ?3
            "#,
        )
        .bind(self.tenant.as_str())
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let totals = PeriodTotals::compute(&sales, &expenses, &payments)?;
        for anomaly in &totals.anomalies {
            warn!(
                sale_id = %anomaly.sale_id,
                derived_credit = %anomaly.derived_credit,
                "Sale paid more than its total; credit counted as zero"
            );
        }

        debug!(
            start = %period.start(),
            end = %period.end(),
            sales = totals.sales_count,
            revenue = %totals.revenue,
            "Computed period totals"
        );
        Ok(totals)
    }

    /// Period totals plus the tenant's current outstanding credit.
    pub async fn summary(&self, period: &ReportPeriod) -> DbResult<Summary> {
        let totals = self.analytics(period).await?;
        let total_pending_credits = ShopRepository::new(self.pool.clone(), self.tenant.clone())
            .total_pending_balance()
            .await?;

        Ok(Summary {
            totals,
            total_pending_credits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig, TenantDb};
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
    use vanledger_core::{
        CoreError, LineItem, Money, NewExpense, NewPayment, NewProduct, NewShop, PaymentType, SaleDraft,
        ValidationError, MAX_AMOUNT,
    };

    async fn tenant_db() -> TenantDb {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().register("Ravi", "9800000001", "secret-pass").await.unwrap();
        db.tenant(TenantId::new(user.id))
    }

    fn today() -> ReportPeriod {
        ReportPeriod::today(Utc::now(), FixedOffset::east_opt(0).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_period_is_all_zero() {
        let db = tenant_db().await;
        let summary = db.reports().summary(&today()).await.unwrap();

        assert_eq!(summary.totals, PeriodTotals::default());
        assert_eq!(summary.total_pending_credits, Money::zero());
    }

    #[tokio::test]
    async fn test_day_totals() {
        let db = tenant_db().await;
        let shop = db
            .shops()
            .create(&NewShop {
                name: "Anand Stores".to_string(),
                area: "Market Road".to_string(),
            })
            .await
            .unwrap();
        let milk = db
            .products()
            .create(&NewProduct {
                name: "Milk".to_string(),
                unit: "packet".to_string(),
                price: Money::from_paise(10_000),
                stock: 100,
            })
            .await
            .unwrap();

        let sale = |paid: Option<i64>, payment_type| SaleDraft {
            shop_id: shop.id.clone(),
            items: vec![LineItem::new(milk.id.clone(), 10, Money::from_paise(10_000))],
            subtotal: None,
            discount: Money::zero(),
            total_amount: None,
            amount_paid: paid.map(Money::from_paise),
            payment_type,
        };

        // 1000 cash paid 600, 1000 upi in full, 1000 on credit
        db.sales().record(&sale(Some(60_000), PaymentType::Cash)).await.unwrap();
        db.sales().record(&sale(None, PaymentType::Upi)).await.unwrap();
        db.sales().record(&sale(None, PaymentType::Credit)).await.unwrap();
        db.expenses()
            .record(&NewExpense {
                description: "Diesel".to_string(),
                amount: Money::from_paise(20_000),
            })
            .await
            .unwrap();
        db.payments()
            .record(&NewPayment {
                shop_id: shop.id.clone(),
                amount: Money::from_paise(30_000),
            })
            .await
            .unwrap();

        let summary = db.reports().summary(&today()).await.unwrap();
        let totals = &summary.totals;
        assert_eq!(totals.cash_total, Money::from_paise(60_000));
        assert_eq!(totals.upi_total, Money::from_paise(100_000));
        assert_eq!(totals.credit_total, Money::from_paise(140_000));
        assert_eq!(totals.revenue, Money::from_paise(300_000));
        assert_eq!(totals.expense_total, Money::from_paise(20_000));
        assert_eq!(totals.old_credit_recovered, Money::from_paise(30_000));
        assert_eq!(totals.net_profit, Money::from_paise(280_000));
        assert_eq!(totals.cash_expected, Money::from_paise(70_000));
        assert_eq!(totals.sales_count, 3);

        // 400 + 1000 credit, less the 300 payment
        assert_eq!(summary.total_pending_credits, Money::from_paise(110_000));

        // Same inputs, same answer
        let again = db.reports().summary(&today()).await.unwrap();
        assert_eq!(again, summary);
    }

    #[tokio::test]
    async fn test_period_bounds_are_inclusive_in_storage() {
        let root = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = root.users().register("Ravi", "9800000001", "secret-pass").await.unwrap();
        let db = root.tenant(TenantId::new(user.id.clone()));
        let shop = db
            .shops()
            .create(&NewShop {
                name: "Anand Stores".to_string(),
                area: "Market Road".to_string(),
            })
            .await
            .unwrap();

        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let period = ReportPeriod::days(day, day, ist).unwrap();

        let stamps: [DateTime<Utc>; 5] = [
            period.start() - Duration::milliseconds(1),
            period.start(),
            period.end(),
            period.end() + Duration::microseconds(1),
            period.end() + Duration::milliseconds(1),
        ];
        for (i, at) in stamps.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sales (id, owner_id, shop_id, subtotal, discount, total_amount,
                                   amount_paid, payment_type, date)
                VALUES (?1, ?2, ?3, 1000, 0, 1000, 1000, 'cash', ?4)
                "#,
            )
            .bind(format!("sale-{i}"))
            .bind(&user.id)
            .bind(&shop.id)
            .bind(*at)
            .execute(root.pool())
            .await
            .unwrap();

            sqlx::query(
                "INSERT INTO expenses (id, owner_id, description, amount, date) VALUES (?1, ?2, 'fuel', 100, ?3)",
            )
            .bind(format!("expense-{i}"))
            .bind(&user.id)
            .bind(*at)
            .execute(root.pool())
            .await
            .unwrap();
        }

        let totals = db.reports().analytics(&period).await.unwrap();
        assert_eq!(totals.sales_count, 2);
        assert_eq!(totals.expenses_count, 2);
        assert_eq!(totals.cash_total, Money::from_paise(2_000));

        let filter = crate::repository::sale::SaleFilter {
            shop_id: None,
            period: Some(period),
        };
        let ids: Vec<String> = db.sales().list(&filter).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["sale-2".to_string(), "sale-1".to_string()]);

        assert_eq!(db.expenses().list(&period).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_amounts_over_the_cap_never_reach_reports() {
        let db = tenant_db().await;

        let err = db
            .expenses()
            .record(&NewExpense {
                description: "Typo".to_string(),
                amount: Money::from_paise(i64::MAX / 2 + 1),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        for _ in 0..2 {
            db.expenses()
                .record(&NewExpense {
                    description: "Truck repair".to_string(),
                    amount: MAX_AMOUNT,
                })
                .await
                .unwrap();
        }

        let totals = db.reports().analytics(&today()).await.unwrap();
        assert_eq!(totals.expense_total, Money::from_paise(2 * MAX_AMOUNT.paise()));
        assert_eq!(totals.net_profit, Money::from_paise(-2 * MAX_AMOUNT.paise()));
    }
}

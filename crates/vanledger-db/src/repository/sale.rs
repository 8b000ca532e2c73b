//! # Sale Repository
//!
//! Sale recording and sale history.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record(draft)                                     │
//! │                                                                         │
//! │  settle_sale(draft)          (core: totals, payment split; no I/O)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ──────────────────────────────────────────────────────────────   │
//! │  1. shops.pending_balance += credit     (write first: takes the lock,  │
//! │                                          0 rows ⇒ shop NotFound)       │
//! │  2. INSERT sales, sale_items                                           │
//! │  3. per line: products.stock -= qty     (guarded under Reject)         │
//! │               INSERT stock_logs 'sales'                                │
//! │  COMMIT ─────────────────────────────────────────────────────────────   │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction: nothing is written.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order delivery runs the same steps inside its own transaction via
//! [`write_sale`].

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;
use vanledger_core::billing::{settle_sale, SettledBill};
use vanledger_core::period::ReportPeriod;
use vanledger_core::{Policies, Sale, SaleDraft, StockLog, StockLogType, TenantId};

use crate::error::{DbError, DbResult};
use crate::ledger;
use crate::repository::stock::insert_stock_log;
use crate::repository::{fetch_items, insert_items, ItemTable};

pub(crate) const SALE_COLUMNS: &str =
    "id, owner_id, shop_id, subtotal, discount, total_amount, amount_paid, payment_type, date";

/// Sale rows with the shop name joined in. The shop may be gone.
const SALE_WITH_SHOP: &str = r#"
    SELECT s.id, s.owner_id, s.shop_id, sh.name AS shop_name, s.subtotal, s.discount,
           s.total_amount, s.amount_paid, s.payment_type, s.date
    FROM sales s
    LEFT JOIN shops sh ON sh.id = s.shop_id AND sh.owner_id = s.owner_id
"#;

/// Filters for the sale history.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub shop_id: Option<String>,
    /// `None` lists every sale.
    pub period: Option<ReportPeriod>,
}

/// Repository for sales of one tenant.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    tenant: TenantId,
    policies: Policies,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId, policies: Policies) -> Self {
        SaleRepository {
            pool,
            tenant,
            policies,
        }
    }

    /// Records a counter sale.
    ///
    /// ## Errors
    /// - `ValidationError` / `TotalsMismatch` from bill checks
    /// - [`DbError::NotFound`] for an unknown shop or product
    /// - `InsufficientStock` under the reject stock policy
    pub async fn record(&self, draft: &SaleDraft) -> DbResult<Sale> {
        let settled = settle_sale(draft)?;

        let mut tx = self.pool.begin().await?;
        let sale = write_sale(&mut tx, &self.tenant, &draft.shop_id, &settled, self.policies).await?;
        tx.commit().await?;

        info!(
            id = %sale.id,
            shop_id = %sale.shop_id,
            total = %sale.total_amount,
            credit = %settled.credit(),
            payment_type = %sale.payment_type,
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Gets a sale with its items.
    pub async fn get(&self, id: &str) -> DbResult<Sale> {
        let sql = format!("{SALE_WITH_SHOP} WHERE s.id = ?1 AND s.owner_id = ?2");
        let mut sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .bind(self.tenant.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        sale.items = fetch_items(&self.pool, ItemTable::Sale, &sale.id).await?;
        Ok(sale)
    }

    /// Lists sales with items, newest first.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        let sql = format!(
            r#"
            {SALE_WITH_SHOP}
            WHERE s.owner_id = ?1
              AND (?2 IS NULL OR s.shop_id = ?2)
              AND (?3 IS NULL OR s.date >= ?3)
              AND (?4 IS NULL OR s.date <= ?4)
            ORDER BY s.date DESC, s.id
            "#
        );

        let mut sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(self.tenant.as_str())
            .bind(filter.shop_id.as_deref())
            .bind(filter.period.map(|p| p.start()))
            .bind(filter.period.map(|p| p.end()))
            .fetch_all(&self.pool)
            .await?;

        for sale in &mut sales {
            sale.items = fetch_items(&self.pool, ItemTable::Sale, &sale.id).await?;
        }

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }
}

/// Writes a settled bill as a sale and feeds both ledgers.
///
/// Runs on the caller's open transaction; the caller commits.
pub(crate) async fn write_sale(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    shop_id: &str,
    settled: &SettledBill,
    policies: Policies,
) -> DbResult<Sale> {
    let bill = settled.bill();
    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        owner_id: tenant.to_string(),
        shop_id: shop_id.to_string(),
        shop_name: None,
        items: bill.items().to_vec(),
        subtotal: bill.subtotal(),
        discount: bill.discount(),
        total_amount: bill.total_amount(),
        amount_paid: Some(settled.amount_paid()),
        payment_type: settled.payment_type(),
        date: Utc::now(),
    };

    debug!(id = %sale.id, shop_id = %shop_id, "Writing sale");

    // Always issued, even for zero credit: it locks the database for writing
    // and proves the shop belongs to the tenant
    ledger::apply_credit(conn, tenant, shop_id, settled.credit()).await?;

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, owner_id, shop_id,
            subtotal, discount, total_amount, amount_paid,
            payment_type, date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.owner_id)
    .bind(&sale.shop_id)
    .bind(sale.subtotal)
    .bind(sale.discount)
    .bind(sale.total_amount)
    .bind(sale.amount_paid)
    .bind(sale.payment_type)
    .bind(sale.date)
    .execute(&mut *conn)
    .await?;

    insert_items(conn, ItemTable::Sale, &sale.id, &sale.items).await?;

    for item in &sale.items {
        ledger::decrement_stock(conn, tenant, &item.product_id, item.quantity, policies.stock).await?;

        let log = StockLog {
            id: Uuid::new_v4().to_string(),
            owner_id: sale.owner_id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            log_type: StockLogType::Sales,
            note: Some(format!("sale {}", sale.id)),
            date: sale.date,
        };
        insert_stock_log(conn, &log).await?;
    }

    Ok(sale)
}

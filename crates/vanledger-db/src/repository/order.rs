//! # Order Repository
//!
//! Take-orders and their fulfillment.
//!
//! ## Status Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    update_status(id, request)                           │
//! │                                                                         │
//! │  load order (id, owner_id) ──► plan_transition (core)                   │
//! │                                    │                                    │
//! │                 ┌──────────────────┴───────────────────┐                │
//! │                 ▼                                      ▼                │
//! │             Cancel                                 Deliver(payment)     │
//! │   UPDATE ... status='cancelled'              settle_delivery (core)     │
//! │   WHERE status='pending'                     BEGIN                      │
//! │                                               1. claim: UPDATE status   │
//! │                                                  WHERE status='pending' │
//! │                                               2. write_sale (ledgers)   │
//! │                                               3. SET sale_id            │
//! │                                              COMMIT                     │
//! │                                                                         │
//! │  The claim is guarded on 'pending': two concurrent deliveries cannot    │
//! │  both record a sale. The loser sees InvalidOrderStatus.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;
use vanledger_core::billing::price_order;
use vanledger_core::order::{plan_transition, settle_delivery, Transition};
use vanledger_core::{
    CoreError, Order, OrderDraft, OrderStatus, OrderStatusUpdate, Policies, Sale, TenantId,
};

use crate::error::{DbError, DbResult};
use crate::ledger;
use crate::repository::sale::write_sale;
use crate::repository::{fetch_items, insert_items, ItemTable};

const ORDER_WITH_SHOP: &str = r#"
    SELECT o.id, o.owner_id, o.shop_id, sh.name AS shop_name, o.subtotal, o.discount,
           o.total_amount, o.status, o.sale_id, o.order_date, o.delivery_date, o.updated_at
    FROM orders o
    LEFT JOIN shops sh ON sh.id = o.shop_id AND sh.owner_id = o.owner_id
"#;

/// Filters for the order board.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Inclusive delivery-date range.
    pub delivery: Option<(NaiveDate, NaiveDate)>,
}

/// Result of a status update. `sale` is set when the order was delivered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTransition {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<Sale>,
}

/// Repository for take-orders of one tenant.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    tenant: TenantId,
    policies: Policies,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId, policies: Policies) -> Self {
        OrderRepository {
            pool,
            tenant,
            policies,
        }
    }

    /// Takes an order for later delivery. Stock and balances are untouched.
    ///
    /// ## Errors
    /// - `ValidationError` / `TotalsMismatch` from bill checks
    /// - [`DbError::NotFound`] for an unknown shop or product
    pub async fn create(&self, draft: &OrderDraft) -> DbResult<Order> {
        let bill = price_order(draft)?;
        let now = Utc::now();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            owner_id: self.tenant.to_string(),
            shop_id: draft.shop_id.clone(),
            shop_name: None,
            items: bill.items().to_vec(),
            subtotal: bill.subtotal(),
            discount: bill.discount(),
            total_amount: bill.total_amount(),
            status: OrderStatus::Pending,
            sale_id: None,
            order_date: now,
            delivery_date: draft.delivery_date,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        // The shop check rides on the insert itself
        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                id, owner_id, shop_id,
                subtotal, discount, total_amount,
                status, sale_id, order_date, delivery_date, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9, ?10
            WHERE EXISTS (SELECT 1 FROM shops WHERE id = ?3 AND owner_id = ?2)
            "#,
        )
        .bind(&order.id)
        .bind(&order.owner_id)
        .bind(&order.shop_id)
        .bind(order.subtotal)
        .bind(order.discount)
        .bind(order.total_amount)
        .bind(order.status)
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", &order.shop_id));
        }

        insert_items(&mut tx, ItemTable::Order, &order.id, &order.items).await?;

        for item in &order.items {
            if !ledger::product_exists(&mut tx, &self.tenant, &item.product_id).await? {
                return Err(DbError::not_found("Product", &item.product_id));
            }
        }

        tx.commit().await?;

        info!(
            id = %order.id,
            shop_id = %order.shop_id,
            total = %order.total_amount,
            delivery_date = %order.delivery_date,
            "Order taken"
        );
        Ok(order)
    }

    /// Gets an order with its items.
    pub async fn get(&self, id: &str) -> DbResult<Order> {
        let sql = format!("{ORDER_WITH_SHOP} WHERE o.id = ?1 AND o.owner_id = ?2");
        let mut order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(self.tenant.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        order.items = fetch_items(&self.pool, ItemTable::Order, &order.id).await?;
        Ok(order)
    }

    /// Lists orders with items, earliest delivery first.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"
            {ORDER_WITH_SHOP}
            WHERE o.owner_id = ?1
              AND (?2 IS NULL OR o.status = ?2)
              AND (?3 IS NULL OR o.delivery_date >= ?3)
              AND (?4 IS NULL OR o.delivery_date <= ?4)
            ORDER BY o.delivery_date ASC, o.order_date ASC, o.id
            "#
        );

        let mut orders = sqlx::query_as::<_, Order>(&sql)
            .bind(self.tenant.as_str())
            .bind(filter.status)
            .bind(filter.delivery.map(|(first, _)| first))
            .bind(filter.delivery.map(|(_, last)| last))
            .fetch_all(&self.pool)
            .await?;

        for order in &mut orders {
            order.items = fetch_items(&self.pool, ItemTable::Order, &order.id).await?;
        }

        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Moves a pending order to `delivered` or `cancelled`.
    ///
    /// Delivery records a sale for the order's bill in the same transaction
    /// that flips the status, so an order is never delivered without its sale.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the order isn't the tenant's
    /// - `InvalidOrderStatus` if the order already left `pending`
    /// - `MissingPaymentInfo` when delivering without payment details
    /// - anything sale recording can return
    pub async fn update_status(&self, id: &str, update: &OrderStatusUpdate) -> DbResult<OrderTransition> {
        let order = self.get(id).await?;

        match plan_transition(&order, update.status, update.payment_info)? {
            Transition::Cancel => {
                let claimed = {
                    let mut conn = self.pool.acquire().await?;
                    self.claim(&mut conn, id, OrderStatus::Cancelled).await?
                };
                if !claimed {
                    return Err(self.stale_transition(id, OrderStatus::Cancelled).await);
                }

                info!(id = %id, "Order cancelled");
                Ok(OrderTransition {
                    order: self.get(id).await?,
                    sale: None,
                })
            }
            Transition::Deliver(payment) => {
                let settled = settle_delivery(&order, payment)?;

                let mut tx = self.pool.begin().await?;
                if !self.claim(&mut tx, id, OrderStatus::Delivered).await? {
                    drop(tx);
                    return Err(self.stale_transition(id, OrderStatus::Delivered).await);
                }

                let sale = write_sale(&mut tx, &self.tenant, &order.shop_id, &settled, self.policies).await?;

                sqlx::query("UPDATE orders SET sale_id = ?1 WHERE id = ?2 AND owner_id = ?3")
                    .bind(&sale.id)
                    .bind(id)
                    .bind(self.tenant.as_str())
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;

                info!(
                    id = %id,
                    sale_id = %sale.id,
                    amount_paid = %settled.amount_paid(),
                    credit = %settled.credit(),
                    "Order delivered"
                );
                Ok(OrderTransition {
                    order: self.get(id).await?,
                    sale: Some(sale),
                })
            }
        }
    }

    /// Moves a still-pending order to `to`. Returns false if it wasn't pending.
    async fn claim(&self, conn: &mut SqliteConnection, id: &str, to: OrderStatus) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?1, updated_at = ?2
            WHERE id = ?3 AND owner_id = ?4 AND status = 'pending'
            "#,
        )
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(self.tenant.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Explains a lost claim: another request moved or removed the order.
    async fn stale_transition(&self, id: &str, requested: OrderStatus) -> DbError {
        match self.get(id).await {
            Ok(current) => {
                warn!(id = %id, current = %current.status, %requested, "Order changed concurrently");
                CoreError::InvalidOrderStatus {
                    order_id: id.to_string(),
                    current: current.status,
                    requested,
                }
                .into()
            }
            Err(err) => err,
        }
    }
}

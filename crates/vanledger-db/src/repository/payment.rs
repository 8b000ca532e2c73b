//! # Payment Repository
//!
//! Money a shop pays against its outstanding credit. Each payment is an
//! append-only log row plus a balance ledger decrement, in one transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use vanledger_core::validation::{validate_amount, validate_reference};
use vanledger_core::{NewPayment, PaymentLog, Policies, TenantId};

use crate::error::DbResult;
use crate::ledger;

/// Repository for credit payments of one tenant.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
    tenant: TenantId,
    policies: Policies,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId, policies: Policies) -> Self {
        PaymentRepository {
            pool,
            tenant,
            policies,
        }
    }

    /// Records a payment and lowers the shop's pending balance.
    ///
    /// ## Errors
    /// - `ValidationError` if the amount isn't positive
    /// - [`crate::DbError::NotFound`] for an unknown shop
    /// - `Overpayment` under the reject overpayment policy
    pub async fn record(&self, input: &NewPayment) -> DbResult<PaymentLog> {
        validate_reference("shopId", &input.shop_id)?;
        validate_amount("amount", input.amount)?;

        let payment = PaymentLog {
            id: Uuid::new_v4().to_string(),
            owner_id: self.tenant.to_string(),
            shop_id: input.shop_id.clone(),
            amount: input.amount,
            date: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        ledger::apply_payment(
            &mut tx,
            &self.tenant,
            &payment.shop_id,
            payment.amount,
            self.policies.overpayment,
        )
        .await?;

        sqlx::query(
            r#"
            INSERT INTO payment_logs (id, owner_id, shop_id, amount, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.owner_id)
        .bind(&payment.shop_id)
        .bind(payment.amount)
        .bind(payment.date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = %payment.id, shop_id = %payment.shop_id, amount = %payment.amount, "Payment recorded");
        Ok(payment)
    }

    /// Lists payments, newest first, optionally for one shop.
    pub async fn list(&self, shop_id: Option<&str>) -> DbResult<Vec<PaymentLog>> {
        let payments = sqlx::query_as::<_, PaymentLog>(
            r#"
            SELECT id, owner_id, shop_id, amount, date
            FROM payment_logs
            WHERE owner_id = ?1 AND (?2 IS NULL OR shop_id = ?2)
            ORDER BY date DESC, id
            "#,
        )
        .bind(self.tenant.as_str())
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = payments.len(), "Listed payments");
        Ok(payments)
    }
}

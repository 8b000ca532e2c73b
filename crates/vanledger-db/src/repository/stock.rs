//! # Stock Repository
//!
//! The stock audit trail.
//!
//! | type      | written by            | moves `products.stock` |
//! |-----------|-----------------------|------------------------|
//! | `morning` | seller (load-out)     | no                     |
//! | `wastage` | seller                | yes, decrement         |
//! | `sales`   | sale recording only   | yes, decrement         |

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;
use vanledger_core::validation::{validate_note, validate_quantity, validate_reference};
use vanledger_core::{NewStockLog, Policies, StockLog, StockLogType, TenantId, ValidationError};

use crate::error::{DbError, DbResult};
use crate::ledger;

/// Repository for stock events of one tenant.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
    tenant: TenantId,
    policies: Policies,
}

impl StockRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId, policies: Policies) -> Self {
        StockRepository {
            pool,
            tenant,
            policies,
        }
    }

    /// Records a morning count or wastage.
    ///
    /// Wastage also decrements stock, in the same transaction. `sales`
    /// entries are reserved for sale recording.
    pub async fn record(&self, input: &NewStockLog) -> DbResult<StockLog> {
        validate_reference("productId", &input.product_id)?;
        validate_quantity(input.quantity)?;
        let note = input
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        validate_note(note)?;

        if input.log_type == StockLogType::Sales {
            return Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec![
                    StockLogType::Morning.to_string(),
                    StockLogType::Wastage.to_string(),
                ],
            }
            .into());
        }

        let log = StockLog {
            id: Uuid::new_v4().to_string(),
            owner_id: self.tenant.to_string(),
            product_id: input.product_id.clone(),
            quantity: input.quantity,
            log_type: input.log_type,
            note: note.map(str::to_string),
            date: Utc::now(),
        };

        // Write first so the transaction holds the write lock from the start
        let mut tx = self.pool.begin().await?;
        if log.log_type.decrements_stock() {
            ledger::decrement_stock(&mut tx, &self.tenant, &log.product_id, log.quantity, self.policies.stock)
                .await?;
            insert_stock_log(&mut tx, &log).await?;
        } else {
            insert_stock_log(&mut tx, &log).await?;
            // A morning count must still name one of the tenant's products
            if !ledger::product_exists(&mut tx, &self.tenant, &log.product_id).await? {
                return Err(DbError::not_found("Product", &log.product_id));
            }
        }
        tx.commit().await?;

        info!(id = %log.id, product_id = %log.product_id, log_type = %log.log_type, "Stock event recorded");
        Ok(log)
    }

    /// Lists stock events, newest first.
    pub async fn list(&self) -> DbResult<Vec<StockLog>> {
        let logs = sqlx::query_as::<_, StockLog>(
            r#"
            SELECT id, owner_id, product_id, quantity, log_type, note, date
            FROM stock_logs
            WHERE owner_id = ?1
            ORDER BY date DESC, id
            "#,
        )
        .bind(self.tenant.as_str())
        .fetch_all(&self.pool)
        .await?;

        debug!(count = logs.len(), "Listed stock logs");
        Ok(logs)
    }
}

pub(crate) async fn insert_stock_log(conn: &mut SqliteConnection, log: &StockLog) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_logs (id, owner_id, product_id, quantity, log_type, note, date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&log.id)
    .bind(&log.owner_id)
    .bind(&log.product_id)
    .bind(log.quantity)
    .bind(log.log_type)
    .bind(log.note.as_deref())
    .bind(log.date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

//! # Shop Repository
//!
//! The shop directory. `pending_balance` is read here but written only by
//! the balance ledger (sales and payments).
//!
//! ## Delete Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete(shop)          ONE transaction, every statement owner-filtered │
//! │                                                                         │
//! │  1. DELETE orders        (order_items follow via FK cascade)           │
//! │  2. DELETE sales         (sale_items follow via FK cascade)            │
//! │  3. DELETE payment_logs                                                │
//! │  4. DELETE shops         0 rows ⇒ NotFound, everything rolls back      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use vanledger_core::validation::{validate_area, validate_shop_name};
use vanledger_core::{Money, NewShop, Shop, ShopUpdate, TenantId};

use crate::error::{DbError, DbResult};

const SHOP_COLUMNS: &str = "id, owner_id, name, area, pending_balance, created_at, updated_at";

/// What a shop deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDeletion {
    pub sales: u64,
    pub payments: u64,
    pub orders: u64,
}

/// Repository for shops of one tenant.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
    tenant: TenantId,
}

impl ShopRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId) -> Self {
        ShopRepository { pool, tenant }
    }

    /// Creates a shop with a zero balance.
    pub async fn create(&self, input: &NewShop) -> DbResult<Shop> {
        let name = input.name.trim();
        let area = input.area.trim();
        validate_shop_name(name)?;
        validate_area(area)?;

        let now = Utc::now();
        let shop = Shop {
            id: Uuid::new_v4().to_string(),
            owner_id: self.tenant.to_string(),
            name: name.to_string(),
            area: area.to_string(),
            pending_balance: Money::zero(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %shop.id, "Creating shop");

        sqlx::query(
            r#"
            INSERT INTO shops (id, owner_id, name, area, pending_balance, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&shop.id)
        .bind(&shop.owner_id)
        .bind(&shop.name)
        .bind(&shop.area)
        .bind(shop.pending_balance)
        .bind(shop.created_at)
        .bind(shop.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Gets a shop by id.
    pub async fn get(&self, id: &str) -> DbResult<Shop> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1 AND owner_id = ?2");
        sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .bind(self.tenant.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Shop", id))
    }

    /// Lists shops sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Shop>> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE owner_id = ?1 ORDER BY name, id");
        let shops = sqlx::query_as::<_, Shop>(&sql)
            .bind(self.tenant.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(shops)
    }

    /// Patches name and/or area. The balance can't be set this way.
    pub async fn update(&self, id: &str, patch: &ShopUpdate) -> DbResult<Shop> {
        let name = patch.name.as_deref().map(str::trim);
        let area = patch.area.as_deref().map(str::trim);
        if let Some(name) = name {
            validate_shop_name(name)?;
        }
        if let Some(area) = area {
            validate_area(area)?;
        }

        debug!(id = %id, "Updating shop");

        let result = sqlx::query(
            r#"
            UPDATE shops
            SET name = COALESCE(?1, name),
                area = COALESCE(?2, area),
                updated_at = ?3
            WHERE id = ?4 AND owner_id = ?5
            "#,
        )
        .bind(name)
        .bind(area)
        .bind(Utc::now())
        .bind(id)
        .bind(self.tenant.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        self.get(id).await
    }

    /// Deletes a shop with its sales, payments and orders.
    pub async fn delete(&self, id: &str) -> DbResult<ShopDeletion> {
        let tenant = self.tenant.as_str();
        let mut tx = self.pool.begin().await?;

        let orders = sqlx::query("DELETE FROM orders WHERE shop_id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(tenant)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let sales = sqlx::query("DELETE FROM sales WHERE shop_id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(tenant)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let payments = sqlx::query("DELETE FROM payment_logs WHERE shop_id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(tenant)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM shops WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(tenant)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            // Dropping the transaction rolls it back
            return Err(DbError::not_found("Shop", id));
        }

        tx.commit().await?;

        info!(id = %id, sales, payments, orders, "Shop deleted");
        Ok(ShopDeletion {
            sales,
            payments,
            orders,
        })
    }

    /// Σ pending_balance over all the tenant's shops, right now.
    pub async fn total_pending_balance(&self) -> DbResult<Money> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(pending_balance) FROM shops WHERE owner_id = ?1")
                .bind(self.tenant.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_paise(total.unwrap_or(0)))
    }
}

//! # Balance and Stock Ledgers
//!
//! The two running aggregates (`shops.pending_balance`, `products.stock`)
//! are only ever changed here, with relative updates on the caller's open
//! transaction.
//!
//! ## Delta Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Aggregate Update Strategy                        │
//! │                                                                     │
//! │  ❌ WRONG: read-modify-write (lost update under concurrency)       │
//! │     SELECT stock ...;  UPDATE products SET stock = 7 ...           │
//! │                                                                     │
//! │  ✅ CORRECT: relative update                                       │
//! │     UPDATE products SET stock = stock - 3 WHERE id = ? AND ...     │
//! │                                                                     │
//! │  Strict policies add a guard to the same statement:                │
//! │     ... AND stock >= 3            (StockPolicy::Reject)            │
//! │     ... AND pending_balance >= ?  (OverpaymentPolicy::Reject)      │
//! │  0 rows affected ⇒ missing row OR guard failed; one extra SELECT   │
//! │  tells the two apart.                                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, warn};
use vanledger_core::{CoreError, Money, OverpaymentPolicy, StockPolicy, TenantId};

use crate::error::{DbError, DbResult};

// =============================================================================
// Balance Ledger
// =============================================================================

/// Adds unpaid credit to a shop's pending balance.
///
/// Also serves as the shop existence check at the start of sale recording,
/// so it runs even for a zero amount.
pub async fn apply_credit(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    shop_id: &str,
    amount: Money,
) -> DbResult<()> {
    debug!(shop_id = %shop_id, amount = %amount, "Applying credit");

    let result = sqlx::query(
        r#"
        UPDATE shops
        SET pending_balance = pending_balance + ?1, updated_at = ?2
        WHERE id = ?3 AND owner_id = ?4
        "#,
    )
    .bind(amount)
    .bind(Utc::now())
    .bind(shop_id)
    .bind(tenant.as_str())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Shop", shop_id));
    }

    Ok(())
}

/// Subtracts a received payment from a shop's pending balance.
///
/// ## Errors
/// - [`DbError::NotFound`] if the shop doesn't exist for the tenant
/// - [`CoreError::Overpayment`] under [`OverpaymentPolicy::Reject`] when the
///   payment exceeds the balance
pub async fn apply_payment(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    shop_id: &str,
    amount: Money,
    policy: OverpaymentPolicy,
) -> DbResult<()> {
    debug!(shop_id = %shop_id, amount = %amount, ?policy, "Applying payment");

    let guarded = matches!(policy, OverpaymentPolicy::Reject);

    let result = sqlx::query(
        r#"
        UPDATE shops
        SET pending_balance = pending_balance - ?1, updated_at = ?2
        WHERE id = ?3 AND owner_id = ?4
          AND (?5 = 0 OR pending_balance >= ?1)
        "#,
    )
    .bind(amount)
    .bind(Utc::now())
    .bind(shop_id)
    .bind(tenant.as_str())
    .bind(guarded)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        if !shop_exists(conn, tenant, shop_id).await? {
            return Err(DbError::not_found("Shop", shop_id));
        }
        warn!(shop_id = %shop_id, amount = %amount, "Payment exceeds pending balance");
        return Err(CoreError::Overpayment {
            shop_id: shop_id.to_string(),
            amount,
        }
        .into());
    }

    Ok(())
}

pub(crate) async fn shop_exists(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    shop_id: &str,
) -> DbResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM shops WHERE id = ?1 AND owner_id = ?2")
        .bind(shop_id)
        .bind(tenant.as_str())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// Lowers a product's stock by exactly `quantity`.
///
/// ## Errors
/// - [`DbError::NotFound`] if the product doesn't exist for the tenant
/// - [`CoreError::InsufficientStock`] under [`StockPolicy::Reject`] when
///   fewer than `quantity` units are on hand
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    product_id: &str,
    quantity: i64,
    policy: StockPolicy,
) -> DbResult<()> {
    debug!(product_id = %product_id, quantity, ?policy, "Decrementing stock");

    let guarded = matches!(policy, StockPolicy::Reject);

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?1, updated_at = ?2
        WHERE id = ?3 AND owner_id = ?4
          AND (?5 = 0 OR stock >= ?1)
        "#,
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(product_id)
    .bind(tenant.as_str())
    .bind(guarded)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        if !product_exists(conn, tenant, product_id).await? {
            return Err(DbError::not_found("Product", product_id));
        }
        warn!(product_id = %product_id, quantity, "Insufficient stock");
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            requested: quantity,
        }
        .into());
    }

    Ok(())
}

pub(crate) async fn product_exists(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    product_id: &str,
) -> DbResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?1 AND owner_id = ?2")
        .bind(product_id)
        .bind(tenant.as_str())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use vanledger_core::{NewProduct, NewShop};

    async fn setup() -> (Database, TenantId, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().register("Ravi", "9800000001", "secret-pass").await.unwrap();
        let tenant = TenantId::new(user.id);
        let scoped = db.tenant(tenant.clone());
        let shop = scoped
            .shops()
            .create(&NewShop {
                name: "Anand Stores".to_string(),
                area: "Market Road".to_string(),
            })
            .await
            .unwrap();
        let product = scoped
            .products()
            .create(&NewProduct {
                name: "Milk".to_string(),
                unit: "packet".to_string(),
                price: Money::from_paise(3_000),
                stock: 10,
            })
            .await
            .unwrap();
        (db, tenant, shop.id, product.id)
    }

    #[tokio::test]
    async fn test_credit_then_payment_restores_balance() {
        let (db, tenant, shop_id, _) = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        apply_credit(&mut conn, &tenant, &shop_id, Money::from_paise(400)).await.unwrap();
        apply_payment(&mut conn, &tenant, &shop_id, Money::from_paise(400), OverpaymentPolicy::Allow)
            .await
            .unwrap();
        drop(conn);

        let shop = db.tenant(tenant).shops().get(&shop_id).await.unwrap();
        assert_eq!(shop.pending_balance, Money::zero());
    }

    #[tokio::test]
    async fn test_overpayment_policy() {
        let (db, tenant, shop_id, _) = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let err = apply_payment(&mut conn, &tenant, &shop_id, Money::from_paise(1), OverpaymentPolicy::Reject)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Overpayment { .. })));

        // Permissive policy lets the balance go negative
        apply_payment(&mut conn, &tenant, &shop_id, Money::from_paise(1), OverpaymentPolicy::Allow)
            .await
            .unwrap();
        drop(conn);

        let shop = db.tenant(tenant).shops().get(&shop_id).await.unwrap();
        assert_eq!(shop.pending_balance, Money::from_paise(-1));
    }

    #[tokio::test]
    async fn test_decrement_stock_exact() {
        let (db, tenant, _, product_id) = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        decrement_stock(&mut conn, &tenant, &product_id, 3, StockPolicy::Reject).await.unwrap();
        drop(conn);

        let product = db.tenant(tenant).products().get(&product_id).await.unwrap();
        assert_eq!(product.stock, 7);
    }

    #[tokio::test]
    async fn test_stock_policy_reject_and_allow() {
        let (db, tenant, _, product_id) = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let err = decrement_stock(&mut conn, &tenant, &product_id, 11, StockPolicy::Reject)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InsufficientStock { requested: 11, .. })));

        decrement_stock(&mut conn, &tenant, &product_id, 11, StockPolicy::AllowNegative)
            .await
            .unwrap();
        drop(conn);

        let product = db.tenant(tenant).products().get(&product_id).await.unwrap();
        assert_eq!(product.stock, -1);
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let (db, tenant, _, _) = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let err = apply_credit(&mut conn, &tenant, "no-such-shop", Money::zero()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = decrement_stock(&mut conn, &tenant, "no-such-product", 1, StockPolicy::Reject)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_other_tenant_cannot_touch_balance() {
        let (db, _, shop_id, _) = setup().await;
        let intruder = db.users().register("Other", "9800000002", "secret-pass").await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let err = apply_credit(&mut conn, &TenantId::new(intruder.id), &shop_id, Money::from_paise(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}

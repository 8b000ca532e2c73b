//! # Product Repository
//!
//! The tenant's catalog.
//!
//! ## Key Operations
//! - Create with a case-insensitive duplicate-name check
//! - Patch (name, unit, list price, stock recount)
//! - Delete (sale and stock history keep the product id)
//!
//! Day-to-day stock movement goes through [`crate::ledger`], not `update`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use vanledger_core::validation::{
    product_name_key, validate_non_negative, validate_product_name, validate_stock_count,
    validate_unit,
};
use vanledger_core::{CoreError, NewProduct, Product, ProductUpdate, TenantId};

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "id, owner_id, name, unit, price, stock, created_at, updated_at";

/// Repository for products of one tenant.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    tenant: TenantId,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId) -> Self {
        ProductRepository { pool, tenant }
    }

    /// Adds a product to the catalog.
    ///
    /// ## Errors
    /// - [`CoreError::DuplicateProduct`] if the tenant already has a product
    ///   with the same name, ignoring case
    pub async fn create(&self, input: &NewProduct) -> DbResult<Product> {
        let name = input.name.trim();
        let unit = input.unit.trim();
        validate_product_name(name)?;
        validate_unit(unit)?;
        validate_non_negative("price", input.price)?;
        validate_stock_count(input.stock)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            owner_id: self.tenant.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Creating product");

        // Check and insert in one statement so two concurrent creates can't
        // both pass the check
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                id, owner_id, name, name_key, unit, price, stock, created_at, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
            WHERE NOT EXISTS (
                SELECT 1 FROM products WHERE owner_id = ?2 AND name_key = ?4
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.owner_id)
        .bind(&product.name)
        .bind(product_name_key(&product.name))
        .bind(&product.unit)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::DuplicateProduct {
                name: product.name,
            }
            .into());
        }

        Ok(product)
    }

    /// Gets a product by id.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND owner_id = ?2");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(self.tenant.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists the catalog sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE owner_id = ?1 ORDER BY name, id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(self.tenant.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Patches a product. A `stock` value replaces the count (recount).
    pub async fn update(&self, id: &str, patch: &ProductUpdate) -> DbResult<Product> {
        let name = patch.name.as_deref().map(str::trim);
        let unit = patch.unit.as_deref().map(str::trim);
        if let Some(name) = name {
            validate_product_name(name)?;
        }
        if let Some(unit) = unit {
            validate_unit(unit)?;
        }
        if let Some(price) = patch.price {
            validate_non_negative("price", price)?;
        }
        if let Some(stock) = patch.stock {
            validate_stock_count(stock)?;
        }

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE(?1, name),
                name_key = COALESCE(?8, name_key),
                unit = COALESCE(?2, unit),
                price = COALESCE(?3, price),
                stock = COALESCE(?4, stock),
                updated_at = ?5
            WHERE id = ?6 AND owner_id = ?7
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(patch.price)
        .bind(patch.stock)
        .bind(Utc::now())
        .bind(id)
        .bind(self.tenant.as_str())
        .bind(name.map(product_name_key))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Removes a product from the catalog.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(self.tenant.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Counts the tenant's products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE owner_id = ?1")
            .bind(self.tenant.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig, TenantDb};
    use vanledger_core::Money;

    async fn tenant_db() -> TenantDb {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().register("Ravi", "9800000001", "secret-pass").await.unwrap();
        db.tenant(TenantId::new(user.id))
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit: "packet".to_string(),
            price: Money::from_paise(2_500),
            stock: 40,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = tenant_db().await;
        let product = db.products().create(&new_product("Bread")).await.unwrap();
        let fetched = db.products().get(&product.id).await.unwrap();
        assert_eq!(fetched.name, "Bread");
        assert_eq!(fetched.price, Money::from_paise(2_500));
        assert_eq!(fetched.stock, 40);
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_ignores_case() {
        let db = tenant_db().await;
        db.products().create(&new_product("Pepsi")).await.unwrap();

        let err = db.products().create(&new_product("pepsi")).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::DuplicateProduct { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_name_folds_non_ascii_case() {
        let db = tenant_db().await;
        db.products().create(&new_product("Ägg")).await.unwrap();
        db.products().create(&new_product("ДОСА")).await.unwrap();

        for name in ["ägg", "ÄGG", "доса"] {
            let err = db.products().create(&new_product(name)).await.unwrap_err();
            assert!(
                matches!(err, DbError::Domain(CoreError::DuplicateProduct { .. })),
                "{name}"
            );
        }
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_renamed_product_keeps_its_name_key() {
        let db = tenant_db().await;
        let product = db.products().create(&new_product("Bread")).await.unwrap();
        db.products()
            .update(
                &product.id,
                &ProductUpdate {
                    name: Some("Éclair".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = db.products().create(&new_product("éCLAIR")).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::DuplicateProduct { .. })));
        db.products().create(&new_product("bread")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = tenant_db().await;
        let product = db.products().create(&new_product("Bread")).await.unwrap();

        let updated = db
            .products()
            .update(
                &product.id,
                &ProductUpdate {
                    price: Some(Money::from_paise(3_000)),
                    stock: Some(12),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Money::from_paise(3_000));
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.unit, "packet");

        db.products().delete(&product.id).await.unwrap();
        assert!(matches!(db.products().get(&product.id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(db.products().delete(&product.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let db = tenant_db().await;
        let mut input = new_product("Bread");
        input.price = Money::from_paise(-1);
        assert!(db.products().create(&input).await.is_err());
    }
}

//! # Repository Module
//!
//! Database repository implementations for VanLedger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tenant-Scoped Repositories                           │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.tenant(tenant).sales().record(&draft)                      │
//! │       ▼                                                                 │
//! │  SaleRepository { pool, tenant, policies }                             │
//! │  ├── record(&self, draft)      one transaction                         │
//! │  ├── get(&self, id)            WHERE id = ? AND owner_id = ?           │
//! │  └── list(&self, filter)       WHERE owner_id = ? ...                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  A repository is built with its tenant and binds it on every query.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts (the only unscoped one)
//! - [`ShopRepository`](shop::ShopRepository) - Shop directory, cascade delete
//! - [`ProductRepository`](product::ProductRepository) - Catalog
//! - [`SaleRepository`](sale::SaleRepository) - Sale recording and history
//! - [`PaymentRepository`](payment::PaymentRepository) - Credit payments
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Expenses
//! - [`StockRepository`](stock::StockRepository) - Stock events
//! - [`OrderRepository`](order::OrderRepository) - Take-orders and delivery
//! - [`ReportRepository`](report::ReportRepository) - Analytics and summary

pub mod expense;
pub mod order;
pub mod payment;
pub mod product;
pub mod report;
pub mod sale;
pub mod shop;
pub mod stock;
pub mod user;

use sqlx::{SqliteConnection, SqlitePool};
use vanledger_core::LineItem;

use crate::error::DbResult;

/// Line-item tables and the column pointing at their parent.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ItemTable {
    Sale,
    Order,
}

impl ItemTable {
    const fn names(self) -> (&'static str, &'static str) {
        match self {
            ItemTable::Sale => ("sale_items", "sale_id"),
            ItemTable::Order => ("order_items", "order_id"),
        }
    }
}

/// Writes a bill's lines in order.
pub(crate) async fn insert_items(
    conn: &mut SqliteConnection,
    table: ItemTable,
    parent_id: &str,
    items: &[LineItem],
) -> DbResult<()> {
    let (table, parent) = table.names();
    let sql = format!(
        "INSERT INTO {table} ({parent}, position, product_id, quantity, price) VALUES (?1, ?2, ?3, ?4, ?5)"
    );

    for (position, item) in items.iter().enumerate() {
        sqlx::query(&sql)
            .bind(parent_id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Reads a bill's lines back in the order they were written, with product
/// names where the product still exists.
pub(crate) async fn fetch_items(pool: &SqlitePool, table: ItemTable, parent_id: &str) -> DbResult<Vec<LineItem>> {
    let (table, parent) = table.names();
    let sql = format!(
        r#"
        SELECT i.product_id, i.quantity, i.price, p.name AS product_name
        FROM {table} i
        LEFT JOIN products p ON p.id = i.product_id
        WHERE i.{parent} = ?1
        ORDER BY i.position
        "#
    );

    let items = sqlx::query_as::<_, LineItem>(&sql)
        .bind(parent_id)
        .fetch_all(pool)
        .await?;

    Ok(items)
}

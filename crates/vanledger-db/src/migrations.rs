//! # Database Migrations
//!
//! The schema is embedded at build time from `migrations/sqlite/` and applied
//! by [`crate::Database::new`] unless `DbConfig::run_migrations` is false.
//!
//! ## Schema
//! ```text
//! users ─┬─< shops ──────< sales ──< sale_items
//!        │     │  └──────< payment_logs
//!        │     └─────────< orders ──< order_items
//!        ├─< products ───< stock_logs
//!        └─< expenses
//! ```
//!
//! Every tenant table carries `owner_id`. Line items and stock logs keep a
//! plain `product_id` so product deletion leaves history intact.
//!
//! New files take the next number (`002_...sql`). Applied files are never
//! edited; sqlx checksums them.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(count = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts, reported by `/health`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((MIGRATOR.migrations.len(), usize::try_from(applied).unwrap_or(0)))
}

//! # vanledger-db: Database Layer for VanLedger
//!
//! This crate provides tenant-scoped storage for VanLedger.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        VanLedger Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /sales)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   vanledger-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Ledgers    │  │   │
//! │  │   │   (pool.rs)   │    │ (per entity)  │    │ (ledger.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ SaleRepo      │───►│ balance +=   │  │   │
//! │  │   │ TenantDb ─────┼───►│ OrderRepo     │    │ stock   -=   │  │   │
//! │  │   │ Migrations    │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  │   every row carries owner_id; every query filters on it       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration and the tenant-scoped handle
//! - [`migrations`] - Embedded database migrations
//! - [`ledger`] - Relative updates to shop balances and product stock
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (shop, sale, order, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vanledger_db::{Database, DbConfig};
//! use vanledger_core::TenantId;
//!
//! let db = Database::new(DbConfig::new("vanledger.db")).await?;
//!
//! let user = db.users().register("Ravi", "9800000001", "secret-pass").await?;
//! let tenant = db.tenant(TenantId::new(user.id));
//!
//! let shops = tenant.shops().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, TenantDb};

// Repository re-exports for convenience
pub use repository::expense::ExpenseRepository;
pub use repository::order::{OrderFilter, OrderRepository, OrderTransition};
pub use repository::payment::PaymentRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::{SaleFilter, SaleRepository};
pub use repository::shop::{ShopDeletion, ShopRepository};
pub use repository::stock::StockRepository;
pub use repository::user::UserRepository;

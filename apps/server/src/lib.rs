//! # VanLedger Server
//!
//! JSON API over the tenant-scoped ledger.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  client ──► router ──► require_auth ──► handler ──► TenantDb repos     │
//! │                │            │               │                          │
//! │                │       TenantId from JWT    └─► ApiError ──► status    │
//! │                └─ /auth/register, /auth/login, /health (public)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers stay thin: they parse input, pick the tenant scope, and map
//! errors. Ledger rules live in `vanledger-db` and `vanledger-core`.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;

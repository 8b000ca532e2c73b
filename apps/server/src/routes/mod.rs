//! HTTP routes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  public        POST /auth/register   POST /auth/login   GET /health    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  require_auth  GET  /auth/me                                           │
//! │                /shops  /shops/{id}        /products  /products/{id}    │
//! │                /sales  /sales/{id}        /payments  /expenses  /stock │
//! │                /orders /orders/{id}       /analytics /summary          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod expenses;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reports;
pub mod sales;
pub mod shops;
pub mod stock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::require_auth;
use crate::state::AppState;

/// `?startDate=&endDate=` shared by the date-scoped listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/shops", post(shops::create).get(shops::list))
        .route(
            "/shops/{id}",
            get(shops::get).patch(shops::update).delete(shops::delete),
        )
        .route("/products", post(products::create).get(products::list))
        .route(
            "/products/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/sales", post(sales::record).get(sales::list))
        .route("/sales/{id}", get(sales::get))
        .route("/payments", post(payments::record).get(payments::list))
        .route("/expenses", post(expenses::record).get(expenses::list))
        .route("/stock", post(stock::record).get(stock::list))
        .route("/orders", post(orders::create).get(orders::list))
        .route(
            "/orders/{id}",
            get(orders::get).patch(orders::update_status),
        )
        .route("/analytics", get(reports::analytics))
        .route("/summary", get(reports::summary))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
}

/// Liveness plus database reachability. Degraded answers 503.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    let database = state.db.health_check().await;
    let (migrations_total, migrations_applied) = match state.db.migration_status().await {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, "Could not read migration status");
            (0, 0)
        }
    };

    let healthy = database && migrations_total > 0 && migrations_applied == migrations_total;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(Health {
            status: if healthy { "ok" } else { "degraded" },
            database,
            migrations_applied,
            migrations_total,
        }),
    )
}

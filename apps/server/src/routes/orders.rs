//! Take-order endpoints.
//!
//! ```text
//! POST  /orders        ──► pending order, no ledger effect
//! PATCH /orders/{id}   ──► delivered (records a sale) | cancelled
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use vanledger_core::{Order, OrderDraft, OrderStatus, OrderStatusUpdate, TenantId};
use vanledger_db::{OrderFilter, OrderTransition};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl OrderQuery {
    /// Delivery-date window; a single date selects that day.
    fn delivery(&self) -> Result<Option<(NaiveDate, NaiveDate)>, ApiError> {
        let (Some(first), Some(last)) = (
            self.start_date.or(self.end_date),
            self.end_date.or(self.start_date),
        ) else {
            return Ok(None);
        };

        if first > last {
            return Err(ApiError::validation(format!(
                "startDate {first} is after endDate {last}"
            )));
        }
        Ok(Some((first, last)))
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<OrderDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(draft) = payload?;
    let order = state.db.tenant(tenant).orders().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let Query(query) = query?;
    let filter = OrderFilter {
        status: query.status,
        delivery: query.delivery()?,
    };
    Ok(Json(state.db.tenant(tenant).orders().list(&filter).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Order>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.tenant(tenant).orders().get(&id).await?))
}

/// Delivering requires `paymentInfo`; the recorded sale is returned alongside.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<OrderStatusUpdate>, JsonRejection>,
) -> Result<Json<OrderTransition>, ApiError> {
    let Path(id) = id?;
    let Json(update) = payload?;
    let transition = state
        .db
        .tenant(tenant)
        .orders()
        .update_status(&id, &update)
        .await?;
    Ok(Json(transition))
}

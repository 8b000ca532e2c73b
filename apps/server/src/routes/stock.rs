//! Stock log endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use vanledger_core::{NewStockLog, StockLog, TenantId};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn record(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<NewStockLog>, JsonRejection>,
) -> Result<(StatusCode, Json<StockLog>), ApiError> {
    let Json(input) = payload?;
    let log = state.db.tenant(tenant).stock().record(&input).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
) -> Result<Json<Vec<StockLog>>, ApiError> {
    Ok(Json(state.db.tenant(tenant).stock().list().await?))
}

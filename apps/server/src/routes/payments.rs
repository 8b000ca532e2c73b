//! Credit payment endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use vanledger_core::{NewPayment, PaymentLog, TenantId};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    pub shop_id: Option<String>,
}

pub async fn record(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<NewPayment>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentLog>), ApiError> {
    let Json(input) = payload?;
    let payment = state.db.tenant(tenant).payments().record(&input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    query: Result<Query<PaymentQuery>, QueryRejection>,
) -> Result<Json<Vec<PaymentLog>>, ApiError> {
    let Query(query) = query?;
    let payments = state
        .db
        .tenant(tenant)
        .payments()
        .list(query.shop_id.as_deref())
        .await?;
    Ok(Json(payments))
}

//! Sale endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use vanledger_core::{Sale, SaleDraft, TenantId};
use vanledger_db::SaleFilter;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleQuery {
    pub shop_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn record(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<SaleDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let Json(draft) = payload?;
    let sale = state.db.tenant(tenant).sales().record(&draft).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Without dates, the whole history is listed.
pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    query: Result<Query<SaleQuery>, QueryRejection>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let Query(query) = query?;

    let period = if query.start_date.is_some() || query.end_date.is_some() {
        Some(state.period(query.start_date, query.end_date)?)
    } else {
        None
    };

    let filter = SaleFilter {
        shop_id: query.shop_id,
        period,
    };
    Ok(Json(state.db.tenant(tenant).sales().list(&filter).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Sale>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.tenant(tenant).sales().get(&id).await?))
}

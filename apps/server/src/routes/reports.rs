//! Analytics and daily summary.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use vanledger_core::finance::{PeriodTotals, Summary};
use vanledger_core::TenantId;

use crate::error::ApiError;
use crate::routes::DateRange;
use crate::state::AppState;

pub async fn analytics(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    query: Result<Query<DateRange>, QueryRejection>,
) -> Result<Json<PeriodTotals>, ApiError> {
    let Query(range) = query?;
    let period = state.period(range.start_date, range.end_date)?;
    Ok(Json(state.db.tenant(tenant).reports().analytics(&period).await?))
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    query: Result<Query<DateRange>, QueryRejection>,
) -> Result<Json<Summary>, ApiError> {
    let Query(range) = query?;
    let period = state.period(range.start_date, range.end_date)?;
    Ok(Json(state.db.tenant(tenant).reports().summary(&period).await?))
}

//! Expense endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use vanledger_core::{Expense, NewExpense, TenantId};

use crate::error::ApiError;
use crate::routes::DateRange;
use crate::state::AppState;

pub async fn record(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let Json(input) = payload?;
    let expense = state.db.tenant(tenant).expenses().record(&input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Defaults to today's expenses.
pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    query: Result<Query<DateRange>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let Query(range) = query?;
    let period = state.period(range.start_date, range.end_date)?;
    Ok(Json(state.db.tenant(tenant).expenses().list(&period).await?))
}

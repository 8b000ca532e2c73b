//! Product catalog endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use vanledger_core::{NewProduct, Product, ProductUpdate, TenantId};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(input) = payload?;
    let product = state.db.tenant(tenant).products().create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.db.tenant(tenant).products().list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.tenant(tenant).products().get(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.db.tenant(tenant).products().update(&id, &patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.tenant(tenant).products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Shop endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use vanledger_core::{NewShop, Shop, ShopUpdate, TenantId};
use vanledger_db::ShopDeletion;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    payload: Result<Json<NewShop>, JsonRejection>,
) -> Result<(StatusCode, Json<Shop>), ApiError> {
    let Json(input) = payload?;
    let shop = state.db.tenant(tenant).shops().create(&input).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
) -> Result<Json<Vec<Shop>>, ApiError> {
    Ok(Json(state.db.tenant(tenant).shops().list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Shop>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.tenant(tenant).shops().get(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ShopUpdate>, JsonRejection>,
) -> Result<Json<Shop>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.db.tenant(tenant).shops().update(&id, &patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ShopDeletion>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.tenant(tenant).shops().delete(&id).await?))
}

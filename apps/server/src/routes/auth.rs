//! Account endpoints: register, login, who-am-I.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vanledger_core::{TenantId, User};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Profile {
            id: user.id,
            name: user.name,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: Profile,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let Json(input) = payload?;
    let user = state
        .db
        .users()
        .register(&input.name, &input.phone, &input.password)
        .await?;

    let token = state.jwt.issue(&user)?;
    info!(user_id = %user.id, "Account registered");
    Ok((
        StatusCode::CREATED,
        Json(Session {
            token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(input) = payload?;
    let Some(user) = state
        .db
        .users()
        .authenticate(&input.phone, &input.password)
        .await?
    else {
        warn!("Failed login attempt");
        return Err(ApiError::unauthorized("Invalid phone or password"));
    };

    let token = state.jwt.issue(&user)?;
    Ok(Json(Session {
        token,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
) -> Result<Json<Profile>, ApiError> {
    let user = state.db.users().get(tenant.as_str()).await?;
    Ok(Json(user.into()))
}

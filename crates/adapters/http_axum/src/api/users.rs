//! JSON REST handlers for users.
//!
//! Passwords are accepted on input but never serialized back.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_domain::id::UserId;
use smartcity_domain::user::{Role, User, UserPatch};

use super::{Deleted, ResourceResponse, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a user.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// `GET /api/users`
pub async fn list<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
) -> Result<ResourceResponse<Vec<User>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let users = state.user_service.list_users().await?;
    Ok(ResourceResponse::Ok(Json(users)))
}

/// `GET /api/users/{id}`
pub async fn get<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<User>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let user_id: UserId = parse_id("User", &id)?;
    let user = state.user_service.get_user(user_id).await?;
    Ok(ResourceResponse::Ok(Json(user)))
}

/// `POST /api/users`
pub async fn create<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ResourceResponse<User>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = User::builder();
    if let Some(name) = req.name {
        builder = builder.name(name);
    }
    if let Some(email) = req.email {
        builder = builder.email(email);
    }
    if let Some(password) = req.password {
        builder = builder.password(password);
    }
    if let Some(role) = req.role {
        builder = builder.role(role);
    }

    let user = builder.build()?;
    let created = state.user_service.create_user(user).await?;
    Ok(ResourceResponse::Created(Json(created)))
}

/// `PATCH /api/users/{id}`
pub async fn update<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<ResourceResponse<User>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let user_id: UserId = parse_id("User", &id)?;
    let Json(patch) = payload?;
    let updated = state.user_service.update_user(user_id, patch).await?;
    Ok(ResourceResponse::Ok(Json(updated)))
}

/// `DELETE /api/users/{id}`
pub async fn delete<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Deleted<UserId>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let user_id: UserId = parse_id("User", &id)?;
    let id = state.user_service.delete_user(user_id).await?;
    Ok(ResourceResponse::Ok(Json(Deleted { id })))
}

//! JSON REST handlers for zones.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_domain::id::ZoneId;
use smartcity_domain::zone::{Zone, ZonePatch};

use super::{Deleted, ResourceResponse, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a zone. `isActive` defaults to `true`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// `GET /api/zones`
pub async fn list<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
) -> Result<ResourceResponse<Vec<Zone>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let zones = state.zone_service.list_zones().await?;
    Ok(ResourceResponse::Ok(Json(zones)))
}

/// `GET /api/zones/{id}`
pub async fn get<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Zone>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let zone_id: ZoneId = parse_id("Zone", &id)?;
    let zone = state.zone_service.get_zone(zone_id).await?;
    Ok(ResourceResponse::Ok(Json(zone)))
}

/// `POST /api/zones`
pub async fn create<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    payload: Result<Json<CreateZoneRequest>, JsonRejection>,
) -> Result<ResourceResponse<Zone>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = Zone::builder();
    if let Some(name) = req.name {
        builder = builder.name(name);
    }
    if let Some(description) = req.description {
        builder = builder.description(description);
    }
    if let Some(is_active) = req.is_active {
        builder = builder.is_active(is_active);
    }

    let zone = builder.build()?;
    let created = state.zone_service.create_zone(zone).await?;
    Ok(ResourceResponse::Created(Json(created)))
}

/// `PATCH /api/zones/{id}`
pub async fn update<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
    payload: Result<Json<ZonePatch>, JsonRejection>,
) -> Result<ResourceResponse<Zone>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let zone_id: ZoneId = parse_id("Zone", &id)?;
    let Json(patch) = payload?;
    let updated = state.zone_service.update_zone(zone_id, patch).await?;
    Ok(ResourceResponse::Ok(Json(updated)))
}

/// `DELETE /api/zones/{id}`
///
/// Refused with 409 while any device is installed in the zone.
pub async fn delete<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Deleted<ZoneId>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let zone_id: ZoneId = parse_id("Zone", &id)?;
    let id = state.zone_service.delete_zone(zone_id).await?;
    Ok(ResourceResponse::Ok(Json(Deleted { id })))
}

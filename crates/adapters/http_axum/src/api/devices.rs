//! JSON REST handlers for devices.
//!
//! Reads return [`DeviceDetails`] with owner, zone and sensors resolved;
//! writes return the stored [`Device`] with plain ids.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_domain::device::{Device, DeviceDetails, DevicePatch, DeviceStatus};
use smartcity_domain::id::{DeviceId, SensorId, UserId, ZoneId};
use smartcity_domain::time::Timestamp;

use super::{Deleted, ResourceResponse, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a device.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub owner_id: Option<UserId>,
    pub zone_id: Option<ZoneId>,
    pub installed_at: Option<Timestamp>,
    pub status: Option<DeviceStatus>,
    pub sensors: Option<Vec<SensorId>>,
}

/// `GET /api/devices`
pub async fn list<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
) -> Result<ResourceResponse<Vec<DeviceDetails>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ResourceResponse::Ok(Json(devices)))
}

/// `GET /api/devices/{id}`
pub async fn get<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<DeviceDetails>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_id("Device", &id)?;
    let device = state.device_service.get_device(device_id).await?;
    Ok(ResourceResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<ResourceResponse<Device>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = Device::builder();
    if let Some(sensors) = req.sensors {
        builder = builder.sensors(sensors);
    }
    if let Some(serial_number) = req.serial_number {
        builder = builder.serial_number(serial_number);
    }
    if let Some(model) = req.model {
        builder = builder.model(model);
    }
    if let Some(owner_id) = req.owner_id {
        builder = builder.owner_id(owner_id);
    }
    if let Some(zone_id) = req.zone_id {
        builder = builder.zone_id(zone_id);
    }
    if let Some(installed_at) = req.installed_at {
        builder = builder.installed_at(installed_at);
    }
    if let Some(status) = req.status {
        builder = builder.status(status);
    }

    let device = builder.build()?;
    let created = state.device_service.create_device(device).await?;
    Ok(ResourceResponse::Created(Json(created)))
}

/// `PATCH /api/devices/{id}`
pub async fn update<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
    payload: Result<Json<DevicePatch>, JsonRejection>,
) -> Result<ResourceResponse<Device>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_id("Device", &id)?;
    let Json(patch) = payload?;
    let updated = state.device_service.update_device(device_id, patch).await?;
    Ok(ResourceResponse::Ok(Json(updated)))
}

/// `DELETE /api/devices/{id}`
pub async fn delete<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Deleted<DeviceId>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_id("Device", &id)?;
    let id = state.device_service.delete_device(device_id).await?;
    Ok(ResourceResponse::Ok(Json(Deleted { id })))
}

//! JSON REST handlers for sensors.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_domain::id::SensorId;
use smartcity_domain::sensor::{Sensor, SensorPatch, SensorType, Unit};

use super::{Deleted, ResourceResponse, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a sensor.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSensorRequest {
    #[serde(rename = "type")]
    pub sensor_type: Option<SensorType>,
    pub unit: Option<Unit>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// `GET /api/sensors`
pub async fn list<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
) -> Result<ResourceResponse<Vec<Sensor>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let sensors = state.sensor_service.list_sensors().await?;
    Ok(ResourceResponse::Ok(Json(sensors)))
}

/// `GET /api/sensors/{id}`
pub async fn get<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Sensor>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let sensor_id: SensorId = parse_id("Sensor", &id)?;
    let sensor = state.sensor_service.get_sensor(sensor_id).await?;
    Ok(ResourceResponse::Ok(Json(sensor)))
}

/// `POST /api/sensors`
pub async fn create<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    payload: Result<Json<CreateSensorRequest>, JsonRejection>,
) -> Result<ResourceResponse<Sensor>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = Sensor::builder();
    if let Some(sensor_type) = req.sensor_type {
        builder = builder.sensor_type(sensor_type);
    }
    if let Some(unit) = req.unit {
        builder = builder.unit(unit);
    }
    if let Some(model) = req.model {
        builder = builder.model(model);
    }
    if let Some(location) = req.location {
        builder = builder.location(location);
    }
    if let Some(is_active) = req.is_active {
        builder = builder.is_active(is_active);
    }

    let sensor = builder.build()?;
    let created = state.sensor_service.create_sensor(sensor).await?;
    Ok(ResourceResponse::Created(Json(created)))
}

/// `PATCH /api/sensors/{id}`
pub async fn update<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
    payload: Result<Json<SensorPatch>, JsonRejection>,
) -> Result<ResourceResponse<Sensor>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let sensor_id: SensorId = parse_id("Sensor", &id)?;
    let Json(patch) = payload?;
    let updated = state.sensor_service.update_sensor(sensor_id, patch).await?;
    Ok(ResourceResponse::Ok(Json(updated)))
}

/// `DELETE /api/sensors/{id}`
///
/// Refused with 409 while readings point at the sensor or a device lists it.
pub async fn delete<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Deleted<SensorId>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let sensor_id: SensorId = parse_id("Sensor", &id)?;
    let id = state.sensor_service.delete_sensor(sensor_id).await?;
    Ok(ResourceResponse::Ok(Json(Deleted { id })))
}

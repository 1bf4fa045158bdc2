//! JSON REST handlers for readings.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_domain::id::{ReadingId, SensorId};
use smartcity_domain::reading::{Reading, ReadingDetails, ReadingPatch};
use smartcity_domain::time::Timestamp;

use super::{Deleted, ResourceResponse, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for recording a reading. `time` defaults to now.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    pub sensor_id: Option<SensorId>,
    pub time: Option<Timestamp>,
    pub value: Option<f64>,
}

/// `GET /api/readings`
pub async fn list<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
) -> Result<ResourceResponse<Vec<ReadingDetails>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let readings = state.reading_service.list_readings().await?;
    Ok(ResourceResponse::Ok(Json(readings)))
}

/// `GET /api/readings/{id}`
pub async fn get<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<ReadingDetails>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let reading_id: ReadingId = parse_id("Reading", &id)?;
    let reading = state.reading_service.get_reading(reading_id).await?;
    Ok(ResourceResponse::Ok(Json(reading)))
}

/// `POST /api/readings`
pub async fn create<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    payload: Result<Json<CreateReadingRequest>, JsonRejection>,
) -> Result<ResourceResponse<Reading>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = Reading::builder();
    if let Some(sensor_id) = req.sensor_id {
        builder = builder.sensor_id(sensor_id);
    }
    if let Some(time) = req.time {
        builder = builder.time(time);
    }
    if let Some(value) = req.value {
        builder = builder.value(value);
    }

    let created = state.reading_service.create_reading(builder).await?;
    Ok(ResourceResponse::Created(Json(created)))
}

/// `PATCH /api/readings/{id}`
pub async fn update<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
    payload: Result<Json<ReadingPatch>, JsonRejection>,
) -> Result<ResourceResponse<Reading>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let reading_id: ReadingId = parse_id("Reading", &id)?;
    let Json(patch) = payload?;
    let updated = state
        .reading_service
        .update_reading(reading_id, patch)
        .await?;
    Ok(ResourceResponse::Ok(Json(updated)))
}

/// `DELETE /api/readings/{id}`
pub async fn delete<UR, ZR, SR, DR, RR>(
    State(state): State<AppState<UR, ZR, SR, DR, RR>>,
    Path(id): Path<String>,
) -> Result<ResourceResponse<Deleted<ReadingId>>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    let reading_id: ReadingId = parse_id("Reading", &id)?;
    let id = state.reading_service.delete_reading(reading_id).await?;
    Ok(ResourceResponse::Ok(Json(Deleted { id })))
}

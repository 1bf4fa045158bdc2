//! JSON REST API handler modules.
//!
//! Every resource exposes the same five routes: list, create, get, patch and
//! delete. Path ids that are not UUIDs are rejected as [`InvalidIdError`]
//! before any service is called.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod readings;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;
#[allow(clippy::missing_errors_doc)]
pub mod users;
#[allow(clippy::missing_errors_doc)]
pub mod zones;

use std::str::FromStr;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_domain::error::{InvalidIdError, SmartCityError};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible successful responses from a resource endpoint.
pub enum ResourceResponse<T> {
    Ok(Json<T>),
    Created(Json<T>),
}

impl<T: Serialize> IntoResponse for ResourceResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted<I> {
    pub id: I,
}

/// Parse a path segment into a typed id.
pub(crate) fn parse_id<T: FromStr>(entity: &'static str, raw: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| {
        ApiError::from(SmartCityError::from(InvalidIdError {
            entity,
            value: raw.to_string(),
        }))
    })
}

/// Build the `/api` sub-router.
pub fn routes<UR, ZR, SR, DR, RR>() -> Router<AppState<UR, ZR, SR, DR, RR>>
where
    UR: UserRepository + Send + Sync + 'static,
    ZR: ZoneRepository + Send + Sync + 'static,
    SR: SensorRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
{
    Router::new()
        // Users
        .route(
            "/users",
            get(users::list::<UR, ZR, SR, DR, RR>).post(users::create::<UR, ZR, SR, DR, RR>),
        )
        .route(
            "/users/{id}",
            get(users::get::<UR, ZR, SR, DR, RR>)
                .patch(users::update::<UR, ZR, SR, DR, RR>)
                .delete(users::delete::<UR, ZR, SR, DR, RR>),
        )
        // Zones
        .route(
            "/zones",
            get(zones::list::<UR, ZR, SR, DR, RR>).post(zones::create::<UR, ZR, SR, DR, RR>),
        )
        .route(
            "/zones/{id}",
            get(zones::get::<UR, ZR, SR, DR, RR>)
                .patch(zones::update::<UR, ZR, SR, DR, RR>)
                .delete(zones::delete::<UR, ZR, SR, DR, RR>),
        )
        // Sensors
        .route(
            "/sensors",
            get(sensors::list::<UR, ZR, SR, DR, RR>).post(sensors::create::<UR, ZR, SR, DR, RR>),
        )
        .route(
            "/sensors/{id}",
            get(sensors::get::<UR, ZR, SR, DR, RR>)
                .patch(sensors::update::<UR, ZR, SR, DR, RR>)
                .delete(sensors::delete::<UR, ZR, SR, DR, RR>),
        )
        // Devices
        .route(
            "/devices",
            get(devices::list::<UR, ZR, SR, DR, RR>).post(devices::create::<UR, ZR, SR, DR, RR>),
        )
        .route(
            "/devices/{id}",
            get(devices::get::<UR, ZR, SR, DR, RR>)
                .patch(devices::update::<UR, ZR, SR, DR, RR>)
                .delete(devices::delete::<UR, ZR, SR, DR, RR>),
        )
        // Readings
        .route(
            "/readings",
            get(readings::list::<UR, ZR, SR, DR, RR>)
                .post(readings::create::<UR, ZR, SR, DR, RR>),
        )
        .route(
            "/readings/{id}",
            get(readings::get::<UR, ZR, SR, DR, RR>)
                .patch(readings::update::<UR, ZR, SR, DR, RR>)
                .delete(readings::delete::<UR, ZR, SR, DR, RR>),
        )
}

//! Shared application state for axum handlers.

use std::sync::Arc;

use smartcity_app::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};
use smartcity_app::services::device_service::DeviceService;
use smartcity_app::services::reading_service::ReadingService;
use smartcity_app::services::sensor_service::SensorService;
use smartcity_app::services::user_service::UserService;
use smartcity_app::services::zone_service::ZoneService;

/// Application state shared across all axum handlers.
///
/// Generic over the five repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repositories themselves do not
/// need to be `Clone` here. Only the `Arc` wrappers are cloned.
pub struct AppState<UR, ZR, SR, DR, RR> {
    /// User CRUD service.
    pub user_service: Arc<UserService<UR, DR>>,
    /// Zone CRUD service.
    pub zone_service: Arc<ZoneService<ZR, DR>>,
    /// Sensor CRUD service.
    pub sensor_service: Arc<SensorService<SR, RR, DR>>,
    /// Device CRUD service with reference checks.
    pub device_service: Arc<DeviceService<DR, UR, ZR, SR>>,
    /// Reading CRUD service.
    pub reading_service: Arc<ReadingService<RR, SR>>,
}

impl<UR, ZR, SR, DR, RR> Clone for AppState<UR, ZR, SR, DR, RR> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            zone_service: Arc::clone(&self.zone_service),
            sensor_service: Arc::clone(&self.sensor_service),
            device_service: Arc::clone(&self.device_service),
            reading_service: Arc::clone(&self.reading_service),
        }
    }
}

impl<UR, ZR, SR, DR, RR> AppState<UR, ZR, SR, DR, RR>
where
    UR: UserRepository + Clone + Send + Sync + 'static,
    ZR: ZoneRepository + Clone + Send + Sync + 'static,
    SR: SensorRepository + Clone + Send + Sync + 'static,
    DR: DeviceRepository + Clone + Send + Sync + 'static,
    RR: ReadingRepository + Clone + Send + Sync + 'static,
{
    /// Wire every service from one handle per repository.
    ///
    /// Each service gets its own clone of the repositories its rules read.
    pub fn new(users: UR, zones: ZR, sensors: SR, devices: DR, readings: RR) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users.clone(), devices.clone())),
            zone_service: Arc::new(ZoneService::new(zones.clone(), devices.clone())),
            sensor_service: Arc::new(SensorService::new(
                sensors.clone(),
                readings.clone(),
                devices.clone(),
            )),
            device_service: Arc::new(DeviceService::new(
                devices,
                users,
                zones,
                sensors.clone(),
            )),
            reading_service: Arc::new(ReadingService::new(readings, sensors)),
        }
    }
}

//! Sensor service — use-cases for managing sensors.

use smartcity_domain::error::{ConflictError, NotFoundError, SmartCityError};
use smartcity_domain::id::SensorId;
use smartcity_domain::sensor::{Sensor, SensorPatch};

use crate::ports::{DeviceRepository, ReadingRepository, SensorRepository};

/// Application service for sensor CRUD operations.
///
/// A sensor is referenced from two places: readings point at it through
/// `sensorId` and devices list it in their sensor set. Either blocks deletion.
pub struct SensorService<SR, RR, DR> {
    sensors: SR,
    readings: RR,
    devices: DR,
}

impl<SR, RR, DR> SensorService<SR, RR, DR>
where
    SR: SensorRepository,
    RR: ReadingRepository,
    DR: DeviceRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(sensors: SR, readings: RR, devices: DR) -> Self {
        Self {
            sensors,
            readings,
            devices,
        }
    }

    /// Create a new sensor after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, sensor), fields(sensor_type = %sensor.sensor_type))]
    pub async fn create_sensor(&self, sensor: Sensor) -> Result<Sensor, SmartCityError> {
        sensor.validate()?;
        let created = self.sensors.create(sensor).await?;
        tracing::info!(sensor_id = %created.id, "sensor created");
        Ok(created)
    }

    /// Look up a sensor by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no sensor with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_sensor(&self, id: SensorId) -> Result<Sensor, SmartCityError> {
        self.sensors.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Sensor",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all sensors.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_sensors(&self) -> Result<Vec<Sensor>, SmartCityError> {
        self.sensors.get_all().await
    }

    /// Apply a partial update to an existing sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] if the sensor does not exist,
    /// [`SmartCityError::Validation`] if the merged sensor is invalid, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_sensor(
        &self,
        id: SensorId,
        patch: SensorPatch,
    ) -> Result<Sensor, SmartCityError> {
        let mut sensor = self.get_sensor(id).await?;
        sensor.apply(patch);
        sensor.validate()?;
        self.sensors.update(sensor).await
    }

    /// Delete a sensor that no reading and no device refers to.
    ///
    /// Readings are checked first so the more common conflict is the one reported.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Conflict`] when readings or devices still
    /// reference the sensor, [`SmartCityError::NotFound`] when no sensor with
    /// `id` exists, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sensor(&self, id: SensorId) -> Result<SensorId, SmartCityError> {
        let readings = self.readings.count_by_sensor(id).await?;
        if readings > 0 {
            tracing::warn!(readings, "refusing to delete sensor with readings");
            return Err(ConflictError::SensorHasReadings { id, readings }.into());
        }
        let devices = self.devices.count_by_sensor(id).await?;
        if devices > 0 {
            tracing::warn!(devices, "refusing to delete sensor attached to devices");
            return Err(ConflictError::SensorAttachedToDevices { id, devices }.into());
        }
        if !self.sensors.delete(id).await? {
            return Err(NotFoundError {
                entity: "Sensor",
                id: id.to_string(),
            }
            .into());
        }
        tracing::info!("sensor deleted");
        Ok(id)
    }
}

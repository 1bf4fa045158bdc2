//! Reading service — use-cases for managing sensor readings.

use std::collections::HashMap;

use smartcity_domain::error::{MissingReferenceError, NotFoundError, SmartCityError};
use smartcity_domain::id::{ReadingId, SensorId};
use smartcity_domain::reading::{Reading, ReadingBuilder, ReadingDetails, ReadingPatch};

use crate::ports::{ReadingRepository, SensorRepository};

/// Application service for reading CRUD operations.
pub struct ReadingService<RR, SR> {
    readings: RR,
    sensors: SR,
}

impl<RR: ReadingRepository, SR: SensorRepository> ReadingService<RR, SR> {
    /// Create a new service backed by the given repositories.
    pub fn new(readings: RR, sensors: SR) -> Self {
        Self { readings, sensors }
    }

    /// Record a reading for an existing sensor.
    ///
    /// The sensor reference is checked before the remaining fields, so an
    /// unknown sensor is reported even when the value is missing too.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::MissingReference`] if the sensor does not
    /// exist, [`SmartCityError::Validation`] if `sensorId` or `value` is
    /// missing, or a storage error propagated from a repository.
    #[tracing::instrument(skip(self, draft), fields(sensor_id = ?draft.pending_sensor_id()))]
    pub async fn create_reading(&self, draft: ReadingBuilder) -> Result<Reading, SmartCityError> {
        if let Some(sensor_id) = draft.pending_sensor_id() {
            self.ensure_sensor_exists(sensor_id).await?;
        }
        let reading = draft.build()?;
        let created = self.readings.create(reading).await?;
        tracing::info!(reading_id = %created.id, "reading recorded");
        Ok(created)
    }

    /// Look up a reading by id with its sensor resolved.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no reading with `id` exists,
    /// or a storage error from a repository.
    pub async fn get_reading(&self, id: ReadingId) -> Result<ReadingDetails, SmartCityError> {
        let reading = self.find_reading(id).await?;
        let sensor = self.sensors.get_by_id(reading.sensor_id).await?;
        Ok(ReadingDetails::resolve(reading, sensor))
    }

    /// List all readings with their sensors resolved.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from a repository.
    pub async fn list_readings(&self) -> Result<Vec<ReadingDetails>, SmartCityError> {
        let readings = self.readings.get_all().await?;
        if readings.is_empty() {
            return Ok(Vec::new());
        }
        let sensors: HashMap<_, _> = self
            .sensors
            .get_all()
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        Ok(readings
            .into_iter()
            .map(|reading| {
                let sensor = sensors.get(&reading.sensor_id).cloned();
                ReadingDetails::resolve(reading, sensor)
            })
            .collect())
    }

    /// Apply a partial update to an existing reading.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] if the reading does not exist,
    /// [`SmartCityError::MissingReference`] if a supplied sensor does not
    /// exist, or a storage error.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_reading(
        &self,
        id: ReadingId,
        patch: ReadingPatch,
    ) -> Result<Reading, SmartCityError> {
        let mut reading = self.find_reading(id).await?;
        if let Some(sensor_id) = patch.sensor_id {
            self.ensure_sensor_exists(sensor_id).await?;
        }
        reading.apply(patch);
        self.readings.update(reading).await
    }

    /// Delete a reading by id.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no reading with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_reading(&self, id: ReadingId) -> Result<ReadingId, SmartCityError> {
        if !self.readings.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!("reading deleted");
        Ok(id)
    }

    async fn find_reading(&self, id: ReadingId) -> Result<Reading, SmartCityError> {
        self.readings
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn ensure_sensor_exists(&self, sensor_id: SensorId) -> Result<(), SmartCityError> {
        if self.sensors.get_by_id(sensor_id).await?.is_none() {
            tracing::warn!(%sensor_id, "reading references unknown sensor");
            return Err(MissingReferenceError::Sensor(sensor_id).into());
        }
        Ok(())
    }
}

fn not_found(id: ReadingId) -> SmartCityError {
    NotFoundError {
        entity: "Reading",
        id: id.to_string(),
    }
    .into()
}

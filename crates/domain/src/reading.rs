//! Reading — a single timestamped value produced by a sensor.

use serde::{Deserialize, Serialize};

use crate::error::{SmartCityError, ValidationError};
use crate::id::{ReadingId, SensorId};
use crate::sensor::Sensor;
use crate::time::{Timestamp, now};

/// A measurement as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: ReadingId,
    pub sensor_id: SensorId,
    pub time: Timestamp,
    pub value: f64,
}

impl Reading {
    /// Create a builder for constructing a [`Reading`].
    #[must_use]
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }

    /// Merge the supplied fields of `patch` into this reading.
    pub fn apply(&mut self, patch: ReadingPatch) {
        if let Some(sensor_id) = patch.sensor_id {
            self.sensor_id = sensor_id;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

/// Step-by-step builder for [`Reading`].
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    id: Option<ReadingId>,
    sensor_id: Option<SensorId>,
    time: Option<Timestamp>,
    value: Option<f64>,
}

impl ReadingBuilder {
    #[must_use]
    pub fn id(mut self, id: ReadingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn sensor_id(mut self, sensor_id: SensorId) -> Self {
        self.sensor_id = Some(sensor_id);
        self
    }

    #[must_use]
    pub fn time(mut self, time: Timestamp) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// The sensor this reading will belong to, if one was set.
    ///
    /// Lets callers check the reference before [`build`](Self::build) reports
    /// missing fields.
    #[must_use]
    pub fn pending_sensor_id(&self) -> Option<SensorId> {
        self.sensor_id
    }

    /// Consume the builder and return a [`Reading`] stamped now unless a time was given.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if `sensorId` or `value` is missing.
    pub fn build(self) -> Result<Reading, SmartCityError> {
        let sensor_id = self
            .sensor_id
            .ok_or(ValidationError::MissingField("sensorId"))?;
        let value = self.value.ok_or(ValidationError::MissingField("value"))?;
        Ok(Reading {
            id: self.id.unwrap_or_default(),
            sensor_id,
            time: self.time.unwrap_or_else(now),
            value,
        })
    }
}

/// Partial update for a [`Reading`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPatch {
    pub sensor_id: Option<SensorId>,
    pub time: Option<Timestamp>,
    pub value: Option<f64>,
}

/// A reading with its sensor resolved; `sensor` is `None` when the reference dangles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingDetails {
    pub id: ReadingId,
    pub sensor: Option<Sensor>,
    pub time: Timestamp,
    pub value: f64,
}

impl ReadingDetails {
    #[must_use]
    pub fn resolve(reading: Reading, sensor: Option<Sensor>) -> Self {
        Self {
            id: reading.id,
            sensor,
            time: reading.time,
            value: reading.value,
        }
    }
}

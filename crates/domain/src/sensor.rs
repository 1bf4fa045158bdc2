//! Sensor — a measuring unit that produces readings.

use serde::{Deserialize, Serialize};

use crate::error::{SmartCityError, ValidationError};
use crate::id::SensorId;

/// Physical quantity a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temperature,
    Humidity,
    Co2,
    Noise,
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature => f.write_str("temperature"),
            Self::Humidity => f.write_str("humidity"),
            Self::Co2 => f.write_str("co2"),
            Self::Noise => f.write_str("noise"),
        }
    }
}

/// Unit a sensor reports its values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "ppm")]
    PartsPerMillion,
    #[serde(rename = "dB")]
    Decibel,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Celsius => f.write_str("°C"),
            Self::Percent => f.write_str("%"),
            Self::PartsPerMillion => f.write_str("ppm"),
            Self::Decibel => f.write_str("dB"),
        }
    }
}

/// A sensor installed somewhere in the city.
///
/// Devices list sensors in their `sensors` set and readings point at a
/// sensor through `sensorId`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: SensorId,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub unit: Unit,
    pub model: String,
    pub location: String,
    pub is_active: bool,
}

impl Sensor {
    /// Create a builder for constructing a [`Sensor`].
    #[must_use]
    pub fn builder() -> SensorBuilder {
        SensorBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] when `model` or `location` is empty.
    pub fn validate(&self) -> Result<(), SmartCityError> {
        if self.model.is_empty() {
            return Err(ValidationError::EmptyField("model").into());
        }
        if self.location.is_empty() {
            return Err(ValidationError::EmptyField("location").into());
        }
        Ok(())
    }

    /// Merge the supplied fields of `patch` into this sensor.
    pub fn apply(&mut self, patch: SensorPatch) {
        if let Some(sensor_type) = patch.sensor_type {
            self.sensor_type = sensor_type;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Step-by-step builder for [`Sensor`].
#[derive(Debug, Default)]
pub struct SensorBuilder {
    id: Option<SensorId>,
    sensor_type: Option<SensorType>,
    unit: Option<Unit>,
    model: Option<String>,
    location: Option<String>,
    is_active: Option<bool>,
}

impl SensorBuilder {
    #[must_use]
    pub fn id(mut self, id: SensorId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn sensor_type(mut self, sensor_type: SensorType) -> Self {
        self.sensor_type = Some(sensor_type);
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Consume the builder, validate, and return a [`Sensor`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if `type` or `unit` is missing,
    /// or `model` / `location` is missing or empty.
    pub fn build(self) -> Result<Sensor, SmartCityError> {
        let sensor_type = self
            .sensor_type
            .ok_or(ValidationError::MissingField("type"))?;
        let unit = self.unit.ok_or(ValidationError::MissingField("unit"))?;
        let sensor = Sensor {
            id: self.id.unwrap_or_default(),
            sensor_type,
            unit,
            model: self.model.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        };
        sensor.validate()?;
        Ok(sensor)
    }
}

/// Partial update for a [`Sensor`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPatch {
    #[serde(rename = "type")]
    pub sensor_type: Option<SensorType>,
    pub unit: Option<Unit>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

//! Device — installed hardware owned by a user, placed in a zone and carrying sensors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{SmartCityError, ValidationError};
use crate::id::{DeviceId, SensorId, UserId, ZoneId};
use crate::sensor::Sensor;
use crate::time::{Timestamp, now};
use crate::user::User;
use crate::zone::Zone;

/// Operational status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    Maintenance,
    Offline,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Maintenance => f.write_str("maintenance"),
            Self::Offline => f.write_str("offline"),
        }
    }
}

/// A device as stored: references are kept as ids.
///
/// Whether `owner_id`, `zone_id` and `sensors` resolve is a storage question
/// and is enforced by the application layer, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub serial_number: String,
    pub model: String,
    pub owner_id: UserId,
    pub zone_id: ZoneId,
    pub installed_at: Timestamp,
    pub status: DeviceStatus,
    pub sensors: Vec<SensorId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] when `serialNumber` or `model` is empty.
    pub fn validate(&self) -> Result<(), SmartCityError> {
        if self.serial_number.is_empty() {
            return Err(ValidationError::EmptyField("serialNumber").into());
        }
        if self.model.is_empty() {
            return Err(ValidationError::EmptyField("model").into());
        }
        Ok(())
    }

    /// Merge the supplied fields of `patch` into this device.
    pub fn apply(&mut self, patch: DevicePatch) {
        if let Some(serial_number) = patch.serial_number {
            self.serial_number = serial_number;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(zone_id) = patch.zone_id {
            self.zone_id = zone_id;
        }
        if let Some(installed_at) = patch.installed_at {
            self.installed_at = installed_at;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(sensors) = patch.sensors {
            self.sensors = dedup_sensors(sensors);
        }
    }
}

/// Remove repeated sensor ids, keeping the first occurrence of each.
#[must_use]
pub fn dedup_sensors(sensors: Vec<SensorId>) -> Vec<SensorId> {
    let mut unique = Vec::with_capacity(sensors.len());
    for id in sensors {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    serial_number: Option<String>,
    model: Option<String>,
    owner_id: Option<UserId>,
    zone_id: Option<ZoneId>,
    installed_at: Option<Timestamp>,
    status: Option<DeviceStatus>,
    sensors: Vec<SensorId>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn zone_id(mut self, zone_id: ZoneId) -> Self {
        self.zone_id = Some(zone_id);
        self
    }

    #[must_use]
    pub fn installed_at(mut self, installed_at: Timestamp) -> Self {
        self.installed_at = Some(installed_at);
        self
    }

    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn sensors(mut self, sensors: impl IntoIterator<Item = SensorId>) -> Self {
        self.sensors.extend(sensors);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// `installedAt` defaults to now and `status` to active.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if `serialNumber`, `model`,
    /// `ownerId` or `zoneId` is missing or empty.
    pub fn build(self) -> Result<Device, SmartCityError> {
        let serial_number = self.serial_number.unwrap_or_default();
        if serial_number.is_empty() {
            return Err(ValidationError::EmptyField("serialNumber").into());
        }
        let model = self.model.unwrap_or_default();
        if model.is_empty() {
            return Err(ValidationError::EmptyField("model").into());
        }
        let owner_id = self
            .owner_id
            .ok_or(ValidationError::MissingField("ownerId"))?;
        let zone_id = self.zone_id.ok_or(ValidationError::MissingField("zoneId"))?;

        Ok(Device {
            id: self.id.unwrap_or_default(),
            serial_number,
            model,
            owner_id,
            zone_id,
            installed_at: self.installed_at.unwrap_or_else(now),
            status: self.status.unwrap_or_default(),
            sensors: dedup_sensors(self.sensors),
        })
    }
}

/// Partial update for a [`Device`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePatch {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub owner_id: Option<UserId>,
    pub zone_id: Option<ZoneId>,
    pub installed_at: Option<Timestamp>,
    pub status: Option<DeviceStatus>,
    pub sensors: Option<Vec<SensorId>>,
}

/// A device with its references resolved to full entities.
///
/// `owner` and `zone` are `None` when the stored reference dangles; sensors
/// that no longer exist are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    pub id: DeviceId,
    pub serial_number: String,
    pub model: String,
    pub owner: Option<User>,
    pub zone: Option<Zone>,
    pub installed_at: Timestamp,
    pub status: DeviceStatus,
    pub sensors: Vec<Sensor>,
}

impl DeviceDetails {
    /// Combine a stored device with the entities its references point to.
    ///
    /// `sensors` is a lookup by id; it may hold more sensors than the device
    /// lists, so one map can serve a whole listing.
    #[must_use]
    pub fn resolve(
        device: Device,
        owner: Option<User>,
        zone: Option<Zone>,
        sensors: &HashMap<SensorId, Sensor>,
    ) -> Self {
        let sensors = device
            .sensors
            .iter()
            .filter_map(|id| sensors.get(id).cloned())
            .collect();
        Self {
            id: device.id,
            serial_number: device.serial_number,
            model: device.model,
            owner,
            zone,
            installed_at: device.installed_at,
            status: device.status,
            sensors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{SensorType, Unit};

    fn valid_builder() -> DeviceBuilder {
        Device::builder()
            .serial_number("SN1")
            .model("M1")
            .owner_id(UserId::new())
            .zone_id(ZoneId::new())
    }

    #[test]
    fn should_default_status_and_installation_time() {
        let before = now();
        let device = valid_builder().build().unwrap();
        assert_eq!(device.status, DeviceStatus::Active);
        assert!(device.installed_at >= before);
        assert!(device.sensors.is_empty());
    }

    #[test]
    fn should_reject_missing_owner() {
        let result = Device::builder()
            .serial_number("SN1")
            .model("M1")
            .zone_id(ZoneId::new())
            .build();
        assert!(matches!(
            result,
            Err(SmartCityError::Validation(ValidationError::MissingField(
                "ownerId"
            )))
        ));
    }

    #[test]
    fn should_reject_empty_serial_number() {
        let result = valid_builder().serial_number("").build();
        assert!(matches!(
            result,
            Err(SmartCityError::Validation(ValidationError::EmptyField(
                "serialNumber"
            )))
        ));
    }

    #[test]
    fn should_collapse_duplicate_sensor_ids() {
        let a = SensorId::new();
        let b = SensorId::new();
        let device = valid_builder().sensors([a, b, a]).build().unwrap();
        assert_eq!(device.sensors, vec![a, b]);
    }

    #[test]
    fn should_patch_only_supplied_fields() {
        let mut device = valid_builder().build().unwrap();
        let owner = device.owner_id;
        device.apply(DevicePatch {
            status: Some(DeviceStatus::Maintenance),
            ..DevicePatch::default()
        });
        assert_eq!(device.status, DeviceStatus::Maintenance);
        assert_eq!(device.owner_id, owner);
        assert_eq!(device.serial_number, "SN1");
    }

    #[test]
    fn should_parse_patch_with_camel_case_keys() {
        let zone = ZoneId::new();
        let patch: DevicePatch =
            serde_json::from_str(&format!(r#"{{"zoneId":"{zone}","status":"offline"}}"#)).unwrap();
        assert_eq!(patch.zone_id, Some(zone));
        assert_eq!(patch.status, Some(DeviceStatus::Offline));
        assert!(patch.owner_id.is_none());
    }

    #[test]
    fn should_resolve_sensors_in_device_order_and_skip_dangling() {
        let kept = Sensor::builder()
            .sensor_type(SensorType::Co2)
            .unit(Unit::PartsPerMillion)
            .model("SCD30")
            .location("Station")
            .build()
            .unwrap();
        let dangling = SensorId::new();
        let device = valid_builder().sensors([dangling, kept.id]).build().unwrap();

        let unrelated = Sensor::builder()
            .sensor_type(SensorType::Noise)
            .unit(Unit::Decibel)
            .model("NM-1")
            .location("Station")
            .build()
            .unwrap();
        let lookup: HashMap<_, _> = [kept.clone(), unrelated]
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let details = DeviceDetails::resolve(device, None, None, &lookup);

        assert_eq!(details.sensors, vec![kept]);
        assert!(details.owner.is_none());
    }
}

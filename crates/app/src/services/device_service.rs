//! Device service — use-cases for managing devices.
//!
//! Devices are the only entity with outgoing references to more than one
//! collection, so most of the integrity rules live here. Every reference is
//! checked before the write is attempted; a failed check never leaves a
//! partially written device behind.

use std::collections::HashMap;

use smartcity_domain::device::{Device, DeviceDetails, DevicePatch, dedup_sensors};
use smartcity_domain::error::{MissingReferenceError, NotFoundError, SmartCityError};
use smartcity_domain::id::{DeviceId, SensorId, UserId, ZoneId};
use smartcity_domain::sensor::Sensor;

use crate::ports::{DeviceRepository, SensorRepository, UserRepository, ZoneRepository};

/// Application service for device CRUD operations.
pub struct DeviceService<DR, UR, ZR, SR> {
    devices: DR,
    users: UR,
    zones: ZR,
    sensors: SR,
}

impl<DR, UR, ZR, SR> DeviceService<DR, UR, ZR, SR>
where
    DR: DeviceRepository,
    UR: UserRepository,
    ZR: ZoneRepository,
    SR: SensorRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(devices: DR, users: UR, zones: ZR, sensors: SR) -> Self {
        Self {
            devices,
            users,
            zones,
            sensors,
        }
    }

    /// Create a new device once its owner, zone and sensors are known to exist.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if invariants fail or the serial
    /// number is taken, [`SmartCityError::MissingReference`] if the owner, the
    /// zone or any sensor does not exist, or a storage error.
    #[tracing::instrument(skip(self, device), fields(serial_number = %device.serial_number))]
    pub async fn create_device(&self, device: Device) -> Result<Device, SmartCityError> {
        device.validate()?;
        self.ensure_owner_exists(device.owner_id).await?;
        self.ensure_zone_exists(device.zone_id).await?;
        self.ensure_sensors_exist(&device.sensors).await?;
        let created = self.devices.create(device).await?;
        tracing::info!(device_id = %created.id, "device created");
        Ok(created)
    }

    /// Look up a device by id and resolve its references.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no device with `id` exists,
    /// or a storage error from a repository.
    pub async fn get_device(&self, id: DeviceId) -> Result<DeviceDetails, SmartCityError> {
        let device = self.find_device(id).await?;
        let owner = self.users.get_by_id(device.owner_id).await?;
        let zone = self.zones.get_by_id(device.zone_id).await?;
        let sensors = by_id(self.sensors.get_by_ids(&device.sensors).await?);
        Ok(DeviceDetails::resolve(device, owner, zone, &sensors))
    }

    /// List all devices with owner, zone and sensors resolved.
    ///
    /// Each referenced collection is read once rather than once per device.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from a repository.
    pub async fn list_devices(&self) -> Result<Vec<DeviceDetails>, SmartCityError> {
        let devices = self.devices.get_all().await?;
        if devices.is_empty() {
            return Ok(Vec::new());
        }
        let users: HashMap<_, _> = self
            .users
            .get_all()
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let zones: HashMap<_, _> = self
            .zones
            .get_all()
            .await?
            .into_iter()
            .map(|z| (z.id, z))
            .collect();
        let sensors = by_id(self.sensors.get_all().await?);

        Ok(devices
            .into_iter()
            .map(|device| {
                let owner = users.get(&device.owner_id).cloned();
                let zone = zones.get(&device.zone_id).cloned();
                DeviceDetails::resolve(device, owner, zone, &sensors)
            })
            .collect())
    }

    /// Apply a partial update to an existing device.
    ///
    /// Only the references present in `patch` are re-checked.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] if the device does not exist,
    /// [`SmartCityError::MissingReference`] if a supplied owner, zone or sensor
    /// does not exist, [`SmartCityError::Validation`] if the merged device is
    /// invalid, or a storage error.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_device(
        &self,
        id: DeviceId,
        patch: DevicePatch,
    ) -> Result<Device, SmartCityError> {
        let mut device = self.find_device(id).await?;
        if let Some(owner_id) = patch.owner_id {
            self.ensure_owner_exists(owner_id).await?;
        }
        if let Some(zone_id) = patch.zone_id {
            self.ensure_zone_exists(zone_id).await?;
        }
        if let Some(sensors) = &patch.sensors {
            self.ensure_sensors_exist(&dedup_sensors(sensors.clone()))
                .await?;
        }
        device.apply(patch);
        device.validate()?;
        self.devices.update(device).await
    }

    /// Delete a device by id. Nothing references devices, so there is no guard.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<DeviceId, SmartCityError> {
        if !self.devices.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!("device deleted");
        Ok(id)
    }

    async fn find_device(&self, id: DeviceId) -> Result<Device, SmartCityError> {
        self.devices
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn ensure_owner_exists(&self, owner_id: UserId) -> Result<(), SmartCityError> {
        if self.users.get_by_id(owner_id).await?.is_none() {
            tracing::warn!(%owner_id, "device references unknown user");
            return Err(MissingReferenceError::User(owner_id).into());
        }
        Ok(())
    }

    async fn ensure_zone_exists(&self, zone_id: ZoneId) -> Result<(), SmartCityError> {
        if self.zones.get_by_id(zone_id).await?.is_none() {
            tracing::warn!(%zone_id, "device references unknown zone");
            return Err(MissingReferenceError::Zone(zone_id).into());
        }
        Ok(())
    }

    /// All-or-nothing: the set is rejected when any member is unknown.
    async fn ensure_sensors_exist(&self, sensors: &[SensorId]) -> Result<(), SmartCityError> {
        if sensors.is_empty() {
            return Ok(());
        }
        let found = self.sensors.count_existing(sensors).await?;
        let requested = sensors.len();
        if found != requested as u64 {
            tracing::warn!(requested, found, "device references unknown sensors");
            return Err(MissingReferenceError::Sensors {
                requested,
                found: usize::try_from(found).unwrap_or(usize::MAX),
            }
            .into());
        }
        Ok(())
    }
}

fn not_found(id: DeviceId) -> SmartCityError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

fn by_id(sensors: Vec<Sensor>) -> HashMap<SensorId, Sensor> {
    sensors.into_iter().map(|s| (s.id, s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::InMemoryStore;
    use smartcity_domain::device::DeviceStatus;
    use smartcity_domain::error::ValidationError;

    type Service = DeviceService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

    fn make_service() -> (Service, InMemoryStore) {
        let store = InMemoryStore::default();
        (
            DeviceService::new(store.clone(), store.clone(), store.clone(), store.clone()),
            store,
        )
    }

    fn device_for(owner_id: UserId, zone_id: ZoneId) -> Device {
        Device::builder()
            .serial_number("SN1")
            .model("M1")
            .owner_id(owner_id)
            .zone_id(zone_id)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_device_when_references_exist() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        let sensor = store.insert_sensor();
        let device = Device::builder()
            .serial_number("SN1")
            .model("M1")
            .owner_id(owner.id)
            .zone_id(zone.id)
            .sensors([sensor.id])
            .build()
            .unwrap();
        let id = device.id;

        svc.create_device(device).await.unwrap();

        let details = svc.get_device(id).await.unwrap();
        assert_eq!(details.owner, Some(owner));
        assert_eq!(details.zone, Some(zone));
        assert_eq!(details.sensors, vec![sensor]);
        assert_eq!(details.status, DeviceStatus::Active);
    }

    #[tokio::test]
    async fn should_reject_unknown_owner_without_persisting() {
        let (svc, store) = make_service();
        let zone = store.insert_zone("North");
        let ghost = UserId::new();

        let err = svc
            .create_device(device_for(ghost, zone.id))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SmartCityError::MissingReference(MissingReferenceError::User(id)) if id == ghost
        ));
        assert!(err.to_string().contains("does not exist"));
        assert_eq!(store.device_count(), 0);
    }

    #[tokio::test]
    async fn should_reject_unknown_zone_without_persisting() {
        let (svc, store) = make_service();
        let owner = store.insert_user();

        let result = svc.create_device(device_for(owner.id, ZoneId::new())).await;

        assert!(matches!(
            result,
            Err(SmartCityError::MissingReference(MissingReferenceError::Zone(_)))
        ));
        assert_eq!(store.device_count(), 0);
    }

    #[tokio::test]
    async fn should_reject_whole_sensor_set_when_one_member_is_unknown() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        let known = store.insert_sensor();
        let device = Device::builder()
            .serial_number("SN1")
            .model("M1")
            .owner_id(owner.id)
            .zone_id(zone.id)
            .sensors([known.id, SensorId::new()])
            .build()
            .unwrap();

        let result = svc.create_device(device).await;

        assert!(matches!(
            result,
            Err(SmartCityError::MissingReference(
                MissingReferenceError::Sensors {
                    requested: 2,
                    found: 1
                }
            ))
        ));
        assert_eq!(store.device_count(), 0);
    }

    #[tokio::test]
    async fn should_reject_empty_model_before_checking_references() {
        let (svc, _) = make_service();
        let mut device = device_for(UserId::new(), ZoneId::new());
        device.model = String::new();

        let result = svc.create_device(device).await;
        assert!(matches!(
            result,
            Err(SmartCityError::Validation(ValidationError::EmptyField("model")))
        ));
    }

    #[tokio::test]
    async fn should_list_devices_with_resolved_references() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        svc.create_device(device_for(owner.id, zone.id)).await.unwrap();
        store.insert_device(
            Device::builder()
                .serial_number("SN-orphan")
                .model("M1")
                .owner_id(UserId::new())
                .zone_id(zone.id)
                .build()
                .unwrap(),
        );

        let all = svc.list_devices().await.unwrap();

        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|d| d.zone.as_ref() == Some(&zone)));
        let orphan = all
            .iter()
            .find(|d| d.serial_number == "SN-orphan")
            .unwrap();
        assert!(orphan.owner.is_none());
    }

    #[tokio::test]
    async fn should_give_each_listed_device_only_its_own_sensors() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        let first = store.insert_sensor();
        let second = store.insert_sensor();
        let shared = store.insert_sensor();
        for (serial, sensors) in [
            ("SN-A", [first.id, shared.id]),
            ("SN-B", [second.id, shared.id]),
        ] {
            store.insert_device(
                Device::builder()
                    .serial_number(serial)
                    .model("M1")
                    .owner_id(owner.id)
                    .zone_id(zone.id)
                    .sensors(sensors)
                    .build()
                    .unwrap(),
            );
        }

        let all = svc.list_devices().await.unwrap();

        let sensors_of = |serial: &str| {
            all.iter()
                .find(|d| d.serial_number == serial)
                .unwrap()
                .sensors
                .clone()
        };
        assert_eq!(sensors_of("SN-A"), vec![first, shared.clone()]);
        assert_eq!(sensors_of("SN-B"), vec![second, shared]);
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_missing() {
        let (svc, _) = make_service();
        let result = svc.get_device(DeviceId::new()).await;
        assert!(matches!(result, Err(SmartCityError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_revalidate_only_supplied_references_on_update() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        let id = svc
            .create_device(device_for(owner.id, zone.id))
            .await
            .unwrap()
            .id;

        let updated = svc
            .update_device(
                id,
                DevicePatch {
                    status: Some(DeviceStatus::Offline),
                    ..DevicePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, DeviceStatus::Offline);
        assert_eq!(updated.owner_id, owner.id);

        let result = svc
            .update_device(
                id,
                DevicePatch {
                    zone_id: Some(ZoneId::new()),
                    ..DevicePatch::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(SmartCityError::MissingReference(MissingReferenceError::Zone(_)))
        ));
        assert_eq!(svc.get_device(id).await.unwrap().zone, Some(zone));
    }

    #[tokio::test]
    async fn should_replace_sensor_set_on_update() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        let sensor = store.insert_sensor();
        let id = svc
            .create_device(device_for(owner.id, zone.id))
            .await
            .unwrap()
            .id;

        let updated = svc
            .update_device(
                id,
                DevicePatch {
                    sensors: Some(vec![sensor.id, sensor.id]),
                    ..DevicePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.sensors, vec![sensor.id]);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_device() {
        let (svc, _) = make_service();
        let result = svc
            .update_device(DeviceId::new(), DevicePatch::default())
            .await;
        assert!(matches!(result, Err(SmartCityError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_device_unconditionally() {
        let (svc, store) = make_service();
        let owner = store.insert_user();
        let zone = store.insert_zone("North");
        let id = svc
            .create_device(device_for(owner.id, zone.id))
            .await
            .unwrap()
            .id;

        assert_eq!(svc.delete_device(id).await.unwrap(), id);
        assert_eq!(store.device_count(), 0);
        assert!(matches!(
            svc.delete_device(id).await,
            Err(SmartCityError::NotFound(_))
        ));
    }
}

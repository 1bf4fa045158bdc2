//! Zone service — use-cases for managing zones.

use smartcity_domain::error::{ConflictError, NotFoundError, SmartCityError};
use smartcity_domain::id::ZoneId;
use smartcity_domain::zone::{Zone, ZonePatch};

use crate::ports::{DeviceRepository, ZoneRepository};

/// Application service for zone CRUD operations.
pub struct ZoneService<ZR, DR> {
    zones: ZR,
    devices: DR,
}

impl<ZR: ZoneRepository, DR: DeviceRepository> ZoneService<ZR, DR> {
    /// Create a new service backed by the given repositories.
    pub fn new(zones: ZR, devices: DR) -> Self {
        Self { zones, devices }
    }

    /// Create a new zone after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, zone), fields(zone_name = %zone.name))]
    pub async fn create_zone(&self, zone: Zone) -> Result<Zone, SmartCityError> {
        zone.validate()?;
        let created = self.zones.create(zone).await?;
        tracing::info!(zone_id = %created.id, "zone created");
        Ok(created)
    }

    /// Look up a zone by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no zone with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_zone(&self, id: ZoneId) -> Result<Zone, SmartCityError> {
        self.zones.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Zone",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all zones.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_zones(&self) -> Result<Vec<Zone>, SmartCityError> {
        self.zones.get_all().await
    }

    /// Apply a partial update to an existing zone.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] if the zone does not exist,
    /// [`SmartCityError::Validation`] if the merged zone is invalid, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_zone(&self, id: ZoneId, patch: ZonePatch) -> Result<Zone, SmartCityError> {
        let mut zone = self.get_zone(id).await?;
        zone.apply(patch);
        zone.validate()?;
        self.zones.update(zone).await
    }

    /// Delete a zone unless devices are still installed in it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Conflict`] when a device references the zone,
    /// [`SmartCityError::NotFound`] when no zone with `id` exists, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_zone(&self, id: ZoneId) -> Result<ZoneId, SmartCityError> {
        let devices = self.devices.count_by_zone(id).await?;
        if devices > 0 {
            tracing::warn!(devices, "refusing to delete zone with installed devices");
            return Err(ConflictError::ZoneHasDevices { id, devices }.into());
        }
        if !self.zones.delete(id).await? {
            return Err(NotFoundError {
                entity: "Zone",
                id: id.to_string(),
            }
            .into());
        }
        tracing::info!("zone deleted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::InMemoryStore;
    use smartcity_domain::device::Device;
    use smartcity_domain::error::ValidationError;
    use smartcity_domain::id::UserId;

    fn make_service() -> (ZoneService<InMemoryStore, InMemoryStore>, InMemoryStore) {
        let store = InMemoryStore::default();
        (ZoneService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn should_create_zone_when_valid() {
        let (svc, _) = make_service();
        let zone = Zone::builder().name("North").build().unwrap();
        let id = zone.id;

        svc.create_zone(zone).await.unwrap();

        let fetched = svc.get_zone(id).await.unwrap();
        assert_eq!(fetched.name, "North");
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let (svc, _) = make_service();
        let mut zone = Zone::builder().name("North").build().unwrap();
        zone.name = String::new();

        let result = svc.create_zone(zone).await;
        assert!(matches!(
            result,
            Err(SmartCityError::Validation(ValidationError::EmptyField("name")))
        ));
    }

    #[tokio::test]
    async fn should_list_all_zones() {
        let (svc, _) = make_service();
        svc.create_zone(Zone::builder().name("North").build().unwrap())
            .await
            .unwrap();
        svc.create_zone(Zone::builder().name("South").build().unwrap())
            .await
            .unwrap();

        let all = svc.list_zones().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn should_leave_name_and_flag_untouched_when_patching_description() {
        let (svc, _) = make_service();
        let id = svc
            .create_zone(Zone::builder().name("North").build().unwrap())
            .await
            .unwrap()
            .id;

        let updated = svc
            .update_zone(
                id,
                ZonePatch {
                    description: Some(Some("x".to_string())),
                    ..ZonePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "North");
        assert!(updated.is_active);
        assert_eq!(updated.description.as_deref(), Some("x"));
        assert_eq!(svc.get_zone(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_zone() {
        let (svc, _) = make_service();
        let result = svc.update_zone(ZoneId::new(), ZonePatch::default()).await;
        assert!(matches!(result, Err(SmartCityError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_guard_zone_until_its_device_is_gone() {
        let (svc, store) = make_service();
        let zone_id = svc
            .create_zone(Zone::builder().name("North").build().unwrap())
            .await
            .unwrap()
            .id;
        let device = Device::builder()
            .serial_number("SN1")
            .model("M1")
            .owner_id(UserId::new())
            .zone_id(zone_id)
            .build()
            .unwrap();
        let device_id = device.id;
        store.insert_device(device);

        let blocked = svc.delete_zone(zone_id).await;
        assert!(matches!(
            blocked,
            Err(SmartCityError::Conflict(ConflictError::ZoneHasDevices { .. }))
        ));

        DeviceRepository::delete(&store, device_id).await.unwrap();

        assert_eq!(svc.delete_zone(zone_id).await.unwrap(), zone_id);
        assert!(matches!(
            svc.get_zone(zone_id).await,
            Err(SmartCityError::NotFound(_))
        ));
    }
}

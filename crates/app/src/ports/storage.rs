//! Storage port — repository traits for persistence.
//!
//! One repository per collection. Besides plain CRUD each trait exposes the
//! counting queries the integrity rules run before a write or delete.
//! `delete` reports whether a row was actually removed.

use std::future::Future;

use smartcity_domain::device::Device;
use smartcity_domain::error::SmartCityError;
use smartcity_domain::id::{DeviceId, ReadingId, SensorId, UserId, ZoneId};
use smartcity_domain::reading::Reading;
use smartcity_domain::sensor::Sensor;
use smartcity_domain::user::User;
use smartcity_domain::zone::Zone;

/// Repository for persisting and querying [`User`]s.
pub trait UserRepository {
    /// Create a new user in storage.
    fn create(&self, user: User) -> impl Future<Output = Result<User, SmartCityError>> + Send;

    /// Get a user by its unique identifier.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SmartCityError>> + Send;

    /// Get all users.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SmartCityError>> + Send;

    /// Overwrite an existing user.
    fn update(&self, user: User) -> impl Future<Output = Result<User, SmartCityError>> + Send;

    /// Delete a user, returning `false` when nothing matched.
    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SmartCityError>> + Send;
}

/// Repository for persisting and querying [`Zone`]s.
pub trait ZoneRepository {
    /// Create a new zone in storage.
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartCityError>> + Send;

    /// Get a zone by its unique identifier.
    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartCityError>> + Send;

    /// Get all zones.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Zone>, SmartCityError>> + Send;

    /// Overwrite an existing zone.
    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartCityError>> + Send;

    /// Delete a zone, returning `false` when nothing matched.
    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartCityError>> + Send;
}

/// Repository for persisting and querying [`Sensor`]s.
pub trait SensorRepository {
    /// Create a new sensor in storage.
    fn create(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SmartCityError>> + Send;

    /// Get a sensor by its unique identifier.
    fn get_by_id(
        &self,
        id: SensorId,
    ) -> impl Future<Output = Result<Option<Sensor>, SmartCityError>> + Send;

    /// Get every sensor whose id is in `ids`. Unknown ids are skipped.
    fn get_by_ids(
        &self,
        ids: &[SensorId],
    ) -> impl Future<Output = Result<Vec<Sensor>, SmartCityError>> + Send;

    /// Get all sensors.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Sensor>, SmartCityError>> + Send;

    /// Count how many of `ids` exist in storage.
    fn count_existing(
        &self,
        ids: &[SensorId],
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send;

    /// Overwrite an existing sensor.
    fn update(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SmartCityError>> + Send;

    /// Delete a sensor, returning `false` when nothing matched.
    fn delete(&self, id: SensorId) -> impl Future<Output = Result<bool, SmartCityError>> + Send;
}

/// Repository for persisting and querying [`Device`]s.
pub trait DeviceRepository {
    /// Create a new device in storage.
    ///
    /// Fails with a validation error when the serial number is already taken.
    fn create(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, SmartCityError>> + Send;

    /// Get a device by its unique identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, SmartCityError>> + Send;

    /// Get all devices.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SmartCityError>> + Send;

    /// Count devices owned by `owner_id`.
    fn count_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send;

    /// Count devices installed in `zone_id`.
    fn count_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send;

    /// Count devices whose sensor set contains `sensor_id`.
    fn count_by_sensor(
        &self,
        sensor_id: SensorId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send;

    /// Overwrite an existing device.
    fn update(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, SmartCityError>> + Send;

    /// Delete a device, returning `false` when nothing matched.
    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<bool, SmartCityError>> + Send;
}

/// Repository for persisting and querying [`Reading`]s.
pub trait ReadingRepository {
    /// Create a new reading in storage.
    fn create(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SmartCityError>> + Send;

    /// Get a reading by its unique identifier.
    fn get_by_id(
        &self,
        id: ReadingId,
    ) -> impl Future<Output = Result<Option<Reading>, SmartCityError>> + Send;

    /// Get all readings.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Reading>, SmartCityError>> + Send;

    /// Count readings produced by `sensor_id`.
    fn count_by_sensor(
        &self,
        sensor_id: SensorId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send;

    /// Overwrite an existing reading.
    fn update(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SmartCityError>> + Send;

    /// Delete a reading, returning `false` when nothing matched.
    fn delete(&self, id: ReadingId) -> impl Future<Output = Result<bool, SmartCityError>> + Send;
}

//! In-memory store shared by the service tests.
//!
//! One [`InMemoryStore`] implements every repository port over the same maps,
//! so cloning it into several services gives them a consistent view.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use smartcity_domain::device::Device;
use smartcity_domain::error::SmartCityError;
use smartcity_domain::id::{DeviceId, ReadingId, SensorId, UserId, ZoneId};
use smartcity_domain::reading::Reading;
use smartcity_domain::sensor::{Sensor, SensorType, Unit};
use smartcity_domain::user::User;
use smartcity_domain::zone::Zone;

use crate::ports::{
    DeviceRepository, ReadingRepository, SensorRepository, UserRepository, ZoneRepository,
};

#[derive(Default)]
struct Collections {
    users: HashMap<UserId, User>,
    zones: HashMap<ZoneId, Zone>,
    sensors: HashMap<SensorId, Sensor>,
    devices: HashMap<DeviceId, Device>,
    readings: HashMap<ReadingId, Reading>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl InMemoryStore {
    pub(crate) fn device_count(&self) -> usize {
        self.inner.lock().unwrap().devices.len()
    }

    pub(crate) fn insert_user(&self) -> User {
        let user = User::builder()
            .name("Ada")
            .email("ada@example.com")
            .password("secret")
            .build()
            .unwrap();
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(user.id, user.clone());
        user
    }

    pub(crate) fn insert_zone(&self, name: &str) -> Zone {
        let zone = Zone::builder().name(name).build().unwrap();
        self.inner
            .lock()
            .unwrap()
            .zones
            .insert(zone.id, zone.clone());
        zone
    }

    pub(crate) fn insert_sensor(&self) -> Sensor {
        let sensor = Sensor::builder()
            .sensor_type(SensorType::Temperature)
            .unit(Unit::Celsius)
            .model("DHT22")
            .location("Plaza Mayor")
            .build()
            .unwrap();
        self.inner
            .lock()
            .unwrap()
            .sensors
            .insert(sensor.id, sensor.clone());
        sensor
    }

    pub(crate) fn insert_device(&self, device: Device) {
        self.inner
            .lock()
            .unwrap()
            .devices
            .insert(device.id, device);
    }

    pub(crate) fn insert_reading(&self, reading: Reading) {
        self.inner
            .lock()
            .unwrap()
            .readings
            .insert(reading.id, reading);
    }
}

impl UserRepository for InMemoryStore {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(user.id, user.clone());
        async { Ok(user) }
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SmartCityError>> + Send {
        let result = self.inner.lock().unwrap().users.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SmartCityError>> + Send {
        let result: Vec<User> = self.inner.lock().unwrap().users.values().cloned().collect();
        async { Ok(result) }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(user.id, user.clone());
        async { Ok(user) }
    }

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
        let removed = self.inner.lock().unwrap().users.remove(&id).is_some();
        async move { Ok(removed) }
    }
}

impl ZoneRepository for InMemoryStore {
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.zones.insert(zone.id, zone.clone());
        async { Ok(zone) }
    }

    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartCityError>> + Send {
        let result = self.inner.lock().unwrap().zones.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Zone>, SmartCityError>> + Send {
        let result: Vec<Zone> = self.inner.lock().unwrap().zones.values().cloned().collect();
        async { Ok(result) }
    }

    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.zones.insert(zone.id, zone.clone());
        async { Ok(zone) }
    }

    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
        let removed = self.inner.lock().unwrap().zones.remove(&id).is_some();
        async move { Ok(removed) }
    }
}

impl SensorRepository for InMemoryStore {
    fn create(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.sensors.insert(sensor.id, sensor.clone());
        async { Ok(sensor) }
    }

    fn get_by_id(
        &self,
        id: SensorId,
    ) -> impl Future<Output = Result<Option<Sensor>, SmartCityError>> + Send {
        let result = self.inner.lock().unwrap().sensors.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_by_ids(
        &self,
        ids: &[SensorId],
    ) -> impl Future<Output = Result<Vec<Sensor>, SmartCityError>> + Send {
        let inner = self.inner.lock().unwrap();
        let result: Vec<Sensor> = ids
            .iter()
            .filter_map(|id| inner.sensors.get(id).cloned())
            .collect();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Sensor>, SmartCityError>> + Send {
        let result: Vec<Sensor> = self
            .inner
            .lock()
            .unwrap()
            .sensors
            .values()
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn count_existing(
        &self,
        ids: &[SensorId],
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let inner = self.inner.lock().unwrap();
        let count = ids.iter().filter(|id| inner.sensors.contains_key(*id)).count() as u64;
        async move { Ok(count) }
    }

    fn update(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.sensors.insert(sensor.id, sensor.clone());
        async { Ok(sensor) }
    }

    fn delete(&self, id: SensorId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
        let removed = self.inner.lock().unwrap().sensors.remove(&id).is_some();
        async move { Ok(removed) }
    }
}

impl DeviceRepository for InMemoryStore {
    fn create(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.devices.insert(device.id, device.clone());
        async { Ok(device) }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, SmartCityError>> + Send {
        let result = self.inner.lock().unwrap().devices.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SmartCityError>> + Send {
        let result: Vec<Device> = self
            .inner
            .lock()
            .unwrap()
            .devices
            .values()
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn count_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .devices
            .values()
            .filter(|d| d.owner_id == owner_id)
            .count() as u64;
        async move { Ok(count) }
    }

    fn count_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .devices
            .values()
            .filter(|d| d.zone_id == zone_id)
            .count() as u64;
        async move { Ok(count) }
    }

    fn count_by_sensor(
        &self,
        sensor_id: SensorId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .devices
            .values()
            .filter(|d| d.sensors.contains(&sensor_id))
            .count() as u64;
        async move { Ok(count) }
    }

    fn update(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.devices.insert(device.id, device.clone());
        async { Ok(device) }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
        let removed = self.inner.lock().unwrap().devices.remove(&id).is_some();
        async move { Ok(removed) }
    }
}

impl ReadingRepository for InMemoryStore {
    fn create(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.readings.insert(reading.id, reading.clone());
        async { Ok(reading) }
    }

    fn get_by_id(
        &self,
        id: ReadingId,
    ) -> impl Future<Output = Result<Option<Reading>, SmartCityError>> + Send {
        let result = self.inner.lock().unwrap().readings.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Reading>, SmartCityError>> + Send {
        let result: Vec<Reading> = self
            .inner
            .lock()
            .unwrap()
            .readings
            .values()
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn count_by_sensor(
        &self,
        sensor_id: SensorId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .readings
            .values()
            .filter(|r| r.sensor_id == sensor_id)
            .count() as u64;
        async move { Ok(count) }
    }

    fn update(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SmartCityError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.readings.insert(reading.id, reading.clone());
        async { Ok(reading) }
    }

    fn delete(&self, id: ReadingId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
        let removed = self.inner.lock().unwrap().readings.remove(&id).is_some();
        async move { Ok(removed) }
    }
}

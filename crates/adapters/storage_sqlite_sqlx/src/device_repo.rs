//! `SQLite` implementation of [`DeviceRepository`].
//!
//! The sensor set is stored inline as a JSON array; `count_by_sensor`
//! searches it with `json_each`.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smartcity_app::ports::DeviceRepository;
use smartcity_domain::device::{Device, DeviceStatus};
use smartcity_domain::error::{SmartCityError, ValidationError};
use smartcity_domain::id::{DeviceId, SensorId, UserId, ZoneId};

use crate::decode;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner_id: String = row.try_get("owner_id")?;
        let zone_id: String = row.try_get("zone_id")?;
        let installed_at: String = row.try_get("installed_at")?;
        let status: String = row.try_get("status")?;
        let sensors: String = row.try_get("sensors")?;

        Ok(Self(Device {
            id: decode::id::<DeviceId>(&id)?,
            serial_number: row.try_get("serial_number")?,
            model: row.try_get("model")?,
            owner_id: decode::id::<UserId>(&owner_id)?,
            zone_id: decode::id::<ZoneId>(&zone_id)?,
            installed_at: decode::timestamp(&installed_at)?,
            status: decode::label::<DeviceStatus>(&status)?,
            sensors: decode::json::<Vec<SensorId>>(&sensors)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO devices (id, serial_number, model, owner_id, zone_id, installed_at, status, sensors) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY rowid";
const UPDATE: &str = "UPDATE devices SET serial_number = ?, model = ?, owner_id = ?, zone_id = ?, installed_at = ?, status = ?, sensors = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";
const COUNT_BY_OWNER: &str = "SELECT COUNT(*) FROM devices WHERE owner_id = ?";
const COUNT_BY_ZONE: &str = "SELECT COUNT(*) FROM devices WHERE zone_id = ?";
const COUNT_BY_SENSOR: &str = "SELECT COUNT(*) FROM devices WHERE EXISTS (SELECT 1 FROM json_each(devices.sensors) WHERE json_each.value = ?)";

/// A UNIQUE violation can only come from `serial_number`.
fn write_error(err: sqlx::Error, serial_number: &str) -> SmartCityError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ValidationError::DuplicateSerialNumber(serial_number.to_string()).into()
        }
        _ => StorageError::from(err).into(),
    }
}

/// `SQLite`-backed device repository.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count(&self, query: &'static str, key: String) -> Result<u64, SmartCityError> {
        let count: i64 = sqlx::query_scalar(query)
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(count.unsigned_abs())
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let sensors = serde_json::to_string(&device.sensors).map_err(StorageError::from)?;

            sqlx::query(INSERT)
                .bind(device.id.to_string())
                .bind(&device.serial_number)
                .bind(&device.model)
                .bind(device.owner_id.to_string())
                .bind(device.zone_id.to_string())
                .bind(device.installed_at.to_rfc3339())
                .bind(device.status.to_string())
                .bind(sensors)
                .execute(&pool)
                .await
                .map_err(|err| write_error(err, &device.serial_number))?;

            Ok(device)
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn count_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        self.count(COUNT_BY_OWNER, owner_id.to_string())
    }

    fn count_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        self.count(COUNT_BY_ZONE, zone_id.to_string())
    }

    fn count_by_sensor(
        &self,
        sensor_id: SensorId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        self.count(COUNT_BY_SENSOR, sensor_id.to_string())
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let sensors = serde_json::to_string(&device.sensors).map_err(StorageError::from)?;

            sqlx::query(UPDATE)
                .bind(&device.serial_number)
                .bind(&device.model)
                .bind(device.owner_id.to_string())
                .bind(device.zone_id.to_string())
                .bind(device.installed_at.to_rfc3339())
                .bind(device.status.to_string())
                .bind(sensors)
                .bind(device.id.to_string())
                .execute(&pool)
                .await
                .map_err(|err| write_error(err, &device.serial_number))?;

            Ok(device)
        }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}

//! `SQLite` implementation of [`SensorRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use smartcity_app::ports::SensorRepository;
use smartcity_domain::error::SmartCityError;
use smartcity_domain::id::SensorId;
use smartcity_domain::sensor::{Sensor, SensorType, Unit};

use crate::decode;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Sensor`].
struct Wrapper(Sensor);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Sensor> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let sensor_type: String = row.try_get("sensor_type")?;
        let unit: String = row.try_get("unit")?;

        Ok(Self(Sensor {
            id: decode::id(&id)?,
            sensor_type: decode::label::<SensorType>(&sensor_type)?,
            unit: decode::label::<Unit>(&unit)?,
            model: row.try_get("model")?,
            location: row.try_get("location")?,
            is_active: row.try_get("is_active")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO sensors (id, sensor_type, unit, model, location, is_active) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM sensors WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM sensors ORDER BY rowid";
const UPDATE: &str = "UPDATE sensors SET sensor_type = ?, unit = ?, model = ?, location = ?, is_active = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM sensors WHERE id = ?";

/// Append `(?, ?, ...)` with one bound id per element.
fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[SensorId]) {
    builder.push(" (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");
}

/// `SQLite`-backed sensor repository.
#[derive(Clone)]
pub struct SqliteSensorRepository {
    pool: SqlitePool,
}

impl SqliteSensorRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SensorRepository for SqliteSensorRepository {
    fn create(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(sensor.id.to_string())
                .bind(sensor.sensor_type.to_string())
                .bind(sensor.unit.to_string())
                .bind(&sensor.model)
                .bind(&sensor.location)
                .bind(sensor.is_active)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(sensor)
        }
    }

    fn get_by_id(
        &self,
        id: SensorId,
    ) -> impl Future<Output = Result<Option<Sensor>, SmartCityError>> + Send {
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

    fn get_by_ids(
        &self,
        ids: &[SensorId],
    ) -> impl Future<Output = Result<Vec<Sensor>, SmartCityError>> + Send {
        let pool = self.pool.clone();
        let ids = ids.to_vec();
        async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM sensors WHERE id IN");
            push_id_list(&mut builder, &ids);

            let rows: Vec<Wrapper> = builder
                .build_query_as()
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Sensor>, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn count_existing(
        &self,
        ids: &[SensorId],
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let pool = self.pool.clone();
        let ids = ids.to_vec();
        async move {
            if ids.is_empty() {
                return Ok(0);
            }
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM sensors WHERE id IN");
            push_id_list(&mut builder, &ids);

            let (count,): (i64,) = builder
                .build_query_as()
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(count.unsigned_abs())
        }
    }

    fn update(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(sensor.sensor_type.to_string())
                .bind(sensor.unit.to_string())
                .bind(&sensor.model)
                .bind(&sensor.location)
                .bind(sensor.is_active)
                .bind(sensor.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(sensor)
        }
    }

    fn delete(&self, id: SensorId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
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

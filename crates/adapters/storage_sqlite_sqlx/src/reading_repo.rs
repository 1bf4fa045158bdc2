//! `SQLite` implementation of [`ReadingRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smartcity_app::ports::ReadingRepository;
use smartcity_domain::error::SmartCityError;
use smartcity_domain::id::{ReadingId, SensorId};
use smartcity_domain::reading::Reading;

use crate::decode;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Reading`].
struct Wrapper(Reading);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Reading> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let sensor_id: String = row.try_get("sensor_id")?;
        let time: String = row.try_get("time")?;

        Ok(Self(Reading {
            id: decode::id::<ReadingId>(&id)?,
            sensor_id: decode::id::<SensorId>(&sensor_id)?,
            time: decode::timestamp(&time)?,
            value: row.try_get("value")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO readings (id, sensor_id, time, value) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM readings WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM readings ORDER BY rowid";
const UPDATE: &str = "UPDATE readings SET sensor_id = ?, time = ?, value = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM readings WHERE id = ?";
const COUNT_BY_SENSOR: &str = "SELECT COUNT(*) FROM readings WHERE sensor_id = ?";

/// `SQLite`-backed reading repository.
#[derive(Clone)]
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingRepository for SqliteReadingRepository {
    fn create(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(reading.id.to_string())
                .bind(reading.sensor_id.to_string())
                .bind(reading.time.to_rfc3339())
                .bind(reading.value)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(reading)
        }
    }

    fn get_by_id(
        &self,
        id: ReadingId,
    ) -> impl Future<Output = Result<Option<Reading>, SmartCityError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<Reading>, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn count_by_sensor(
        &self,
        sensor_id: SensorId,
    ) -> impl Future<Output = Result<u64, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let count: i64 = sqlx::query_scalar(COUNT_BY_SENSOR)
                .bind(sensor_id.to_string())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(count.unsigned_abs())
        }
    }

    fn update(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(reading.sensor_id.to_string())
                .bind(reading.time.to_rfc3339())
                .bind(reading.value)
                .bind(reading.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(reading)
        }
    }

    fn delete(&self, id: ReadingId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::{TimeZone, Utc};

    async fn setup() -> SqliteReadingRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteReadingRepository::new(db.pool().clone())
    }

    fn reading(sensor_id: SensorId, value: f64) -> Reading {
        Reading::builder()
            .sensor_id(sensor_id)
            .value(value)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_reading_with_exact_time() {
        let repo = setup().await;
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let reading = Reading::builder()
            .sensor_id(SensorId::new())
            .value(22.5)
            .time(at)
            .build()
            .unwrap();
        let id = reading.id;

        repo.create(reading.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, reading);
        assert_eq!(fetched.time, at);
    }

    #[tokio::test]
    async fn should_keep_sub_second_precision_of_defaulted_time() {
        let repo = setup().await;
        let reading = reading(SensorId::new(), 1.0);
        let id = reading.id;
        repo.create(reading.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.time, reading.time);
    }

    #[tokio::test]
    async fn should_return_none_when_reading_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(ReadingId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_count_readings_by_sensor() {
        let repo = setup().await;
        let sensor = SensorId::new();
        repo.create(reading(sensor, 1.0)).await.unwrap();
        repo.create(reading(sensor, 2.0)).await.unwrap();
        repo.create(reading(SensorId::new(), 3.0)).await.unwrap();

        assert_eq!(repo.count_by_sensor(sensor).await.unwrap(), 2);
        assert_eq!(repo.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn should_update_reading_when_exists() {
        let repo = setup().await;
        let mut reading = reading(SensorId::new(), 1.0);
        let id = reading.id;
        repo.create(reading.clone()).await.unwrap();

        reading.value = -4.25;
        repo.update(reading).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert!((fetched.value + 4.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_delete_reading_when_exists() {
        let repo = setup().await;
        let reading = reading(SensorId::new(), 1.0);
        let id = reading.id;
        repo.create(reading).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }
}

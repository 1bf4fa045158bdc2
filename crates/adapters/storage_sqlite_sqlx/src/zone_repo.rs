//! `SQLite` implementation of [`ZoneRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smartcity_app::ports::ZoneRepository;
use smartcity_domain::error::SmartCityError;
use smartcity_domain::id::ZoneId;
use smartcity_domain::zone::Zone;

use crate::decode;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Zone`].
struct Wrapper(Zone);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Zone> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(Zone {
            id: decode::id(&id)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            is_active: row.try_get("is_active")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO zones (id, name, description, is_active) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM zones WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM zones ORDER BY rowid";
const UPDATE: &str = "UPDATE zones SET name = ?, description = ?, is_active = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM zones WHERE id = ?";

/// `SQLite`-backed zone repository.
#[derive(Clone)]
pub struct SqliteZoneRepository {
    pool: SqlitePool,
}

impl SqliteZoneRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ZoneRepository for SqliteZoneRepository {
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(zone.id.to_string())
                .bind(&zone.name)
                .bind(&zone.description)
                .bind(zone.is_active)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(zone)
        }
    }

    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartCityError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<Zone>, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartCityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&zone.name)
                .bind(&zone.description)
                .bind(zone.is_active)
                .bind(zone.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(zone)
        }
    }

    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartCityError>> + Send {
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

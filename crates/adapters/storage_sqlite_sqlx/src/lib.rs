//! # smartcity-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `smartcity-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `smartcity-app` (for port traits) and `smartcity-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.
//!
//! Every repository is a cheap handle around a cloned [`sqlx::SqlitePool`], so
//! one repository value can be handed to several services.

mod decode;
pub mod device_repo;
pub mod error;
pub mod pool;
pub mod reading_repo;
pub mod sensor_repo;
pub mod user_repo;
pub mod zone_repo;

pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use reading_repo::SqliteReadingRepository;
pub use sensor_repo::SqliteSensorRepository;
pub use user_repo::SqliteUserRepository;
pub use zone_repo::SqliteZoneRepository;

//! # smartcity-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`, `ZoneRepository`, `SensorRepository`,
//!     `DeviceRepository`, `ReadingRepository` — CRUD plus the counting
//!     queries the integrity rules need
//! - Define **driving/inbound ports** as use-case structs, one per entity.
//!   They own the referential-integrity and cascade-guard rules:
//!   - a device may only point at existing users, zones and sensors
//!   - a reading may only point at an existing sensor
//!   - users, zones and sensors cannot be deleted while something references them
//!
//! ## Dependency rule
//! Depends on `smartcity-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.
//!
//! ## Consistency
//! Reference checks and the writes they guard are separate store calls. Two
//! concurrent requests can interleave between them (a device created while its
//! zone is being deleted), which leaves a dangling reference. Reads tolerate
//! this: resolved views report a missing owner or zone as `null`.

pub mod ports;
pub mod services;

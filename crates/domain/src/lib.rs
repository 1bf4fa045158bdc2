//! # smartcity-domain
//!
//! Pure domain model for the smart-city IoT asset inventory.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define **Users** (owners of devices)
//! - Define **Zones** (districts or areas where devices are installed)
//! - Define **Sensors** (measuring units, possibly shared between devices)
//! - Define **Devices** (installed hardware referencing an owner, a zone and sensors)
//! - Define **Readings** (timestamped values produced by a sensor)
//! - Define the typed **patches** used for partial updates
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Cross-entity rules (does this owner exist? may this zone be deleted?) need
//! storage access and therefore live in the `app` crate.

pub mod error;
pub mod id;
mod patch;
pub mod time;

pub mod device;
pub mod reading;
pub mod sensor;
pub mod user;
pub mod zone;

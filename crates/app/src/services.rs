//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! A service receives every repository its rules need to look at, so the
//! device service sees users, zones and sensors as well as devices.

pub mod device_service;
pub mod reading_service;
pub mod sensor_service;
pub mod user_service;
pub mod zone_service;

#[cfg(test)]
pub(crate) mod testing;

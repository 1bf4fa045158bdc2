//! Error taxonomy shared by every layer.
//!
//! Each failure class is its own typed error and converts into
//! [`SmartCityError`] via `#[from]`. Adapters map the variants to their own
//! representation (HTTP status codes, log levels); the domain never does.

use crate::id::{SensorId, UserId, ZoneId};

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum SmartCityError {
    /// Input is missing a required field or carries a malformed value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A well-formed identifier resolved to nothing.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// An identifier could not be parsed at all.
    #[error(transparent)]
    InvalidId(#[from] InvalidIdError),

    /// A referenced user, zone or sensor does not exist.
    #[error(transparent)]
    MissingReference(#[from] MissingReferenceError),

    /// A delete was refused because other entities still point at the target.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Unexpected failure of the underlying store.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Shape violations detected before anything touches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required string field is missing or empty.
    #[error("`{0}` is required and must not be empty")]
    EmptyField(&'static str),

    /// A required non-string field is missing.
    #[error("`{0}` is required")]
    MissingField(&'static str),

    /// Another device already carries this serial number.
    #[error("serial number `{0}` is already in use")]
    DuplicateSerialNumber(String),
}

impl ValidationError {
    /// Name of the offending field, when the error is tied to one.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField(field) | Self::MissingField(field) => field,
            Self::DuplicateSerialNumber(_) => "serialNumber",
        }
    }
}

/// Lookup of a well-formed id that matched no stored entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// An identifier that is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {entity} id `{value}`")]
pub struct InvalidIdError {
    pub entity: &'static str,
    pub value: String,
}

/// A reference to another entity that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingReferenceError {
    #[error("user {0} does not exist")]
    User(UserId),

    #[error("zone {0} does not exist")]
    Zone(ZoneId),

    #[error("sensor {0} does not exist")]
    Sensor(SensorId),

    /// Some members of a sensor set do not exist; the store only reports how many matched.
    #[error("one or more sensors do not exist ({found} of {requested} found)")]
    Sensors { requested: usize, found: usize },
}

/// Delete refused because dependents still reference the target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("user {id} cannot be deleted: it owns {devices} device(s)")]
    UserOwnsDevices { id: UserId, devices: u64 },

    #[error("zone {id} cannot be deleted: {devices} device(s) are installed in it")]
    ZoneHasDevices { id: ZoneId, devices: u64 },

    #[error("sensor {id} cannot be deleted: it has associated readings ({readings}), delete them first")]
    SensorHasReadings { id: SensorId, readings: u64 },

    #[error("sensor {id} cannot be deleted: it is attached to {devices} device(s)")]
    SensorAttachedToDevices { id: SensorId, devices: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_field_of_empty_field_error() {
        assert_eq!(ValidationError::EmptyField("email").field(), "email");
    }

    #[test]
    fn should_attribute_duplicate_serial_to_serial_number_field() {
        let err = ValidationError::DuplicateSerialNumber("SN1".to_string());
        assert_eq!(err.field(), "serialNumber");
        assert_eq!(err.to_string(), "serial number `SN1` is already in use");
    }

    #[test]
    fn should_mention_missing_user_in_message() {
        let id = UserId::new();
        let err: SmartCityError = MissingReferenceError::User(id).into();
        assert_eq!(err.to_string(), format!("user {id} does not exist"));
    }

    #[test]
    fn should_mention_associated_readings_in_sensor_conflict() {
        let err = ConflictError::SensorHasReadings {
            id: SensorId::new(),
            readings: 3,
        };
        assert!(err.to_string().contains("associated readings"));
    }

    #[test]
    fn should_convert_not_found_into_top_level_error() {
        let err: SmartCityError = NotFoundError {
            entity: "Zone",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, SmartCityError::NotFound(_)));
        assert_eq!(err.to_string(), "Zone abc not found");
    }
}

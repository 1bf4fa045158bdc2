//! Zone — a district or area of the city where devices are installed.

use serde::{Deserialize, Serialize};

use crate::error::{SmartCityError, ValidationError};
use crate::id::ZoneId;

/// A named area of the city. Devices reference zones through `zoneId`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Zone {
    /// Create a builder for constructing a [`Zone`].
    #[must_use]
    pub fn builder() -> ZoneBuilder {
        ZoneBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), SmartCityError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        Ok(())
    }

    /// Merge the supplied fields of `patch` into this zone.
    pub fn apply(&mut self, patch: ZonePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Step-by-step builder for [`Zone`].
#[derive(Debug, Default)]
pub struct ZoneBuilder {
    id: Option<ZoneId>,
    name: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
}

impl ZoneBuilder {
    #[must_use]
    pub fn id(mut self, id: ZoneId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Consume the builder, validate, and return a [`Zone`].
    ///
    /// New zones are active unless stated otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Zone, SmartCityError> {
        let zone = Zone {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description,
            is_active: self.is_active.unwrap_or(true),
        };
        zone.validate()?;
        Ok(zone)
    }
}

/// Partial update for a [`Zone`].
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePatch {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_active_when_not_specified() {
        let zone = Zone::builder().name("North").build().unwrap();
        assert!(zone.is_active);
        assert!(zone.description.is_none());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Zone::builder().name("").build();
        assert!(matches!(
            result,
            Err(SmartCityError::Validation(ValidationError::EmptyField("name")))
        ));
    }

    #[test]
    fn should_keep_untouched_fields_when_patching_description() {
        let mut zone = Zone::builder()
            .name("North")
            .is_active(false)
            .build()
            .unwrap();
        let patch: ZonePatch = serde_json::from_str(r#"{"description":"x"}"#).unwrap();

        zone.apply(patch);

        assert_eq!(zone.name, "North");
        assert!(!zone.is_active);
        assert_eq!(zone.description.as_deref(), Some("x"));
    }

    #[test]
    fn should_clear_description_when_patched_with_null() {
        let mut zone = Zone::builder()
            .name("North")
            .description("d")
            .build()
            .unwrap();

        let absent: ZonePatch = serde_json::from_str(r#"{"name":"North"}"#).unwrap();
        zone.apply(absent);
        assert_eq!(zone.description.as_deref(), Some("d"));

        let cleared: ZonePatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        zone.apply(cleared);
        assert!(zone.description.is_none());
        assert_eq!(zone.name, "North");
    }

    #[test]
    fn should_serialize_with_camel_case_keys() {
        let zone = Zone::builder().name("Harbour").build().unwrap();
        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["name"], "Harbour");
    }
}

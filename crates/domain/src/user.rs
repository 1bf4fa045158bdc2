//! User — a person who owns devices.

use serde::{Deserialize, Serialize};

use crate::error::{SmartCityError, ValidationError};
use crate::id::UserId;

/// Access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
    Technician,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Viewer => f.write_str("viewer"),
            Self::Technician => f.write_str("technician"),
        }
    }
}

/// A registered user. Devices reference users through `ownerId`.
///
/// The password is stored as given and never serialized back out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Option<Role>,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] when `name`, `email` or
    /// `password` is empty.
    pub fn validate(&self) -> Result<(), SmartCityError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        if self.email.is_empty() {
            return Err(ValidationError::EmptyField("email").into());
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }
        Ok(())
    }

    /// Merge the supplied fields of `patch` into this user.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<Role>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if a required field is missing or empty.
    pub fn build(self) -> Result<User, SmartCityError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            role: self.role,
        };
        user.validate()?;
        Ok(user)
    }
}

/// Partial update for a [`User`]. Absent fields keep their stored value.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `Some(None)` removes the role.
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub role: Option<Option<Role>>,
}

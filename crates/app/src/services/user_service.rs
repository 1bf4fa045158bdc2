//! User service — use-cases for managing users.

use smartcity_domain::error::{ConflictError, NotFoundError, SmartCityError};
use smartcity_domain::id::UserId;
use smartcity_domain::user::{User, UserPatch};

use crate::ports::{DeviceRepository, UserRepository};

/// Application service for user CRUD operations.
///
/// Holds the device repository so a user who still owns devices cannot be deleted.
pub struct UserService<UR, DR> {
    users: UR,
    devices: DR,
}

impl<UR: UserRepository, DR: DeviceRepository> UserService<UR, DR> {
    /// Create a new service backed by the given repositories.
    pub fn new(users: UR, devices: DR) -> Self {
        Self { users, devices }
    }

    /// Create a new user after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_user(&self, user: User) -> Result<User, SmartCityError> {
        user.validate()?;
        let created = self.users.create(user).await?;
        tracing::info!("user created");
        Ok(created)
    }

    /// Look up a user by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_user(&self, id: UserId) -> Result<User, SmartCityError> {
        self.users.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_users(&self) -> Result<Vec<User>, SmartCityError> {
        self.users.get_all().await
    }

    /// Apply a partial update to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::NotFound`] if the user does not exist,
    /// [`SmartCityError::Validation`] if the merged user is invalid, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, SmartCityError> {
        let mut user = self.get_user(id).await?;
        user.apply(patch);
        user.validate()?;
        self.users.update(user).await
    }

    /// Delete a user unless devices still name it as their owner.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCityError::Conflict`] when the user owns at least one
    /// device, [`SmartCityError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<UserId, SmartCityError> {
        let devices = self.devices.count_by_owner(id).await?;
        if devices > 0 {
            tracing::warn!(devices, "refusing to delete user that owns devices");
            return Err(ConflictError::UserOwnsDevices { id, devices }.into());
        }
        if !self.users.delete(id).await? {
            return Err(NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into());
        }
        tracing::info!("user deleted");
        Ok(id)
    }
}

//! Owner writes and lookups.

use tracing::{info, instrument};

use vetcare_core::OwnerId;

use crate::db::ClinicStore;
use crate::error::AppError;
use crate::models::{CreateOwnerInput, EntityKind, Owner, UpdateOwnerInput};

/// Owner operations. Owners carry no references, so nothing is checked
/// beyond field validation and email uniqueness.
pub struct OwnerService<'a> {
    store: &'a dyn ClinicStore,
}

impl<'a> OwnerService<'a> {
    /// Create a new owner service.
    #[must_use]
    pub const fn new(store: &'a dyn ClinicStore) -> Self {
        Self { store }
    }

    /// List every owner in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list(&self) -> Result<Vec<Owner>, AppError> {
        Ok(self.store.list_owners().await?)
    }

    /// Get one owner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the owner does not exist.
    pub async fn get(&self, id: OwnerId) -> Result<Owner, AppError> {
        self.store
            .get_owner(id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Owner))
    }

    /// Validate and insert an owner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` or `AppError::Duplicate` on bad input.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &CreateOwnerInput) -> Result<Owner, AppError> {
        let new = input.validate()?;
        let owner = self.store.create_owner(&new).await?;
        info!(owner_id = %owner.id, "Created owner");
        Ok(owner)
    }

    /// Validate and apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the owner does not exist, or
    /// `AppError::Validation` / `AppError::Duplicate` on bad input.
    #[instrument(skip(self, input), fields(owner_id = %id))]
    pub async fn update(&self, id: OwnerId, input: &UpdateOwnerInput) -> Result<Owner, AppError> {
        let patch = input.validate()?;
        let owner = self
            .store
            .update_owner(id, &patch)
            .await
            .map_err(AppError::from_repository(EntityKind::Owner))?;
        info!("Updated owner");
        Ok(owner)
    }

    /// Delete an owner. Their pets keep the now-dangling reference.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the owner does not exist.
    #[instrument(skip(self), fields(owner_id = %id))]
    pub async fn delete(&self, id: OwnerId) -> Result<(), AppError> {
        self.store
            .delete_owner(id)
            .await
            .map_err(AppError::from_repository(EntityKind::Owner))?;
        info!("Deleted owner");
        Ok(())
    }
}

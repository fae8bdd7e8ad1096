//! Veterinarian writes and lookups.

use tracing::{info, instrument};

use vetcare_core::VetId;

use crate::db::ClinicStore;
use crate::error::AppError;
use crate::models::{CreateVetInput, EntityKind, UpdateVetInput, Veterinarian};

/// Veterinarian operations.
pub struct VetService<'a> {
    store: &'a dyn ClinicStore,
}

impl<'a> VetService<'a> {
    /// Create a new veterinarian service.
    #[must_use]
    pub const fn new(store: &'a dyn ClinicStore) -> Self {
        Self { store }
    }

    /// List every veterinarian in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list(&self) -> Result<Vec<Veterinarian>, AppError> {
        Ok(self.store.list_vets().await?)
    }

    /// Get one veterinarian.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the veterinarian does not exist.
    pub async fn get(&self, id: VetId) -> Result<Veterinarian, AppError> {
        self.store
            .get_vet(id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Veterinarian))
    }

    /// Validate and insert a veterinarian.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` on bad input, or `AppError::Duplicate`
    /// if the email or license number is taken.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &CreateVetInput) -> Result<Veterinarian, AppError> {
        let new = input.validate()?;
        let vet = self.store.create_vet(&new).await?;
        info!(veterinarian_id = %vet.id, "Created veterinarian");
        Ok(vet)
    }

    /// Validate and apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the veterinarian does not exist, or
    /// `AppError::Validation` / `AppError::Duplicate` on bad input.
    #[instrument(skip(self, input), fields(veterinarian_id = %id))]
    pub async fn update(
        &self,
        id: VetId,
        input: &UpdateVetInput,
    ) -> Result<Veterinarian, AppError> {
        let patch = input.validate()?;
        let vet = self
            .store
            .update_vet(id, &patch)
            .await
            .map_err(AppError::from_repository(EntityKind::Veterinarian))?;
        info!("Updated veterinarian");
        Ok(vet)
    }

    /// Delete a veterinarian. Their visits keep the now-dangling reference.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the veterinarian does not exist.
    #[instrument(skip(self), fields(veterinarian_id = %id))]
    pub async fn delete(&self, id: VetId) -> Result<(), AppError> {
        self.store
            .delete_vet(id)
            .await
            .map_err(AppError::from_repository(EntityKind::Veterinarian))?;
        info!("Deleted veterinarian");
        Ok(())
    }
}

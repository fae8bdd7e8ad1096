//! Pet writes.
//!
//! Reads go through [`ClinicQueries`](super::ClinicQueries), which joins each
//! pet to its owner.

use tracing::{info, instrument};

use vetcare_core::PetId;

use super::{ClinicQueries, ReferenceValidator};
use crate::db::ClinicStore;
use crate::error::AppError;
use crate::models::{CreatePetInput, EntityKind, PetListItem, UpdatePetInput};

/// Pet operations with owner reference checks.
pub struct PetService<'a> {
    store: &'a dyn ClinicStore,
}

impl<'a> PetService<'a> {
    /// Create a new pet service.
    #[must_use]
    pub const fn new(store: &'a dyn ClinicStore) -> Self {
        Self { store }
    }

    /// Validate and insert a pet. The owner must exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` on bad input, or
    /// `AppError::MissingReference` if the owner does not exist.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &CreatePetInput) -> Result<PetListItem, AppError> {
        let new = input.validate()?;
        ReferenceValidator::new(self.store)
            .require_owner(new.owner)
            .await?;

        let pet = self.store.create_pet(&new).await?;
        info!(pet_id = %pet.id, owner_id = %pet.owner, "Created pet");
        ClinicQueries::new(self.store).pet_list_item(pet).await
    }

    /// Validate and apply a partial update.
    ///
    /// The owner is re-checked only when the payload carries it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the pet does not exist,
    /// `AppError::MissingReference` if a new owner does not exist, or
    /// `AppError::Validation` on bad input.
    #[instrument(skip(self, input), fields(pet_id = %id))]
    pub async fn update(&self, id: PetId, input: &UpdatePetInput) -> Result<PetListItem, AppError> {
        let patch = input.validate()?;
        if let Some(owner) = patch.owner {
            ReferenceValidator::new(self.store)
                .require_owner(owner)
                .await?;
        }

        let pet = self
            .store
            .update_pet(id, &patch)
            .await
            .map_err(AppError::from_repository(EntityKind::Pet))?;
        info!("Updated pet");
        ClinicQueries::new(self.store).pet_list_item(pet).await
    }

    /// Delete a pet. Its visits keep the now-dangling reference.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the pet does not exist.
    #[instrument(skip(self), fields(pet_id = %id))]
    pub async fn delete(&self, id: PetId) -> Result<(), AppError> {
        self.store
            .delete_pet(id)
            .await
            .map_err(AppError::from_repository(EntityKind::Pet))?;
        info!("Deleted pet");
        Ok(())
    }
}

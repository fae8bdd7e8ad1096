//! Visit writes.

use chrono::Utc;
use tracing::{info, instrument};

use vetcare_core::VisitId;

use super::{ClinicQueries, ReferenceValidator};
use crate::db::ClinicStore;
use crate::error::AppError;
use crate::models::{CreateVisitInput, EntityKind, UpdateVisitInput, VisitListItem};

/// Visit operations with pet and veterinarian reference checks.
pub struct VisitService<'a> {
    store: &'a dyn ClinicStore,
}

impl<'a> VisitService<'a> {
    /// Create a new visit service.
    #[must_use]
    pub const fn new(store: &'a dyn ClinicStore) -> Self {
        Self { store }
    }

    /// Validate and insert a visit. Pet and veterinarian must both exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` on bad input, or
    /// `AppError::MissingReference` if either reference does not exist.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &CreateVisitInput) -> Result<VisitListItem, AppError> {
        let new = input.validate(Utc::now())?;
        let references = ReferenceValidator::new(self.store);
        references.require_pet(new.pet).await?;
        references.require_vet(new.veterinarian).await?;

        let visit = self.store.create_visit(&new).await?;
        info!(
            visit_id = %visit.id,
            pet_id = %visit.pet,
            veterinarian_id = %visit.veterinarian,
            "Created visit"
        );
        ClinicQueries::new(self.store).visit_list_item(visit).await
    }

    /// Validate and apply a partial update.
    ///
    /// Pet and veterinarian are each re-checked only when present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the visit does not exist,
    /// `AppError::MissingReference` if a new reference does not exist, or
    /// `AppError::Validation` on bad input.
    #[instrument(skip(self, input), fields(visit_id = %id))]
    pub async fn update(
        &self,
        id: VisitId,
        input: &UpdateVisitInput,
    ) -> Result<VisitListItem, AppError> {
        let patch = input.validate()?;
        let references = ReferenceValidator::new(self.store);
        if let Some(pet) = patch.pet {
            references.require_pet(pet).await?;
        }
        if let Some(vet) = patch.veterinarian {
            references.require_vet(vet).await?;
        }

        let visit = self
            .store
            .update_visit(id, &patch)
            .await
            .map_err(AppError::from_repository(EntityKind::Visit))?;
        info!("Updated visit");
        ClinicQueries::new(self.store).visit_list_item(visit).await
    }

    /// Delete a visit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the visit does not exist.
    #[instrument(skip(self), fields(visit_id = %id))]
    pub async fn delete(&self, id: VisitId) -> Result<(), AppError> {
        self.store
            .delete_visit(id)
            .await
            .map_err(AppError::from_repository(EntityKind::Visit))?;
        info!("Deleted visit");
        Ok(())
    }
}

//! Reference checks.
//!
//! Every write that carries a reference to another record calls one of these
//! before touching the store. A reference that does not resolve rejects the
//! whole write with `AppError::MissingReference`, so nothing is persisted.

use tracing::debug;

use vetcare_core::{OwnerId, PetId, VetId};

use crate::db::ClinicStore;
use crate::error::AppError;
use crate::models::EntityKind;

/// Checks that referenced owners, pets and veterinarians exist.
pub struct ReferenceValidator<'a> {
    store: &'a dyn ClinicStore,
}

impl<'a> ReferenceValidator<'a> {
    /// Create a validator over a store.
    #[must_use]
    pub const fn new(store: &'a dyn ClinicStore) -> Self {
        Self { store }
    }

    /// Require that an owner exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingReference` if it does not.
    pub async fn require_owner(&self, id: OwnerId) -> Result<(), AppError> {
        if self.store.owner_exists(id).await? {
            return Ok(());
        }
        debug!(owner_id = %id, "Referenced owner missing");
        Err(AppError::MissingReference(EntityKind::Owner))
    }

    /// Require that a pet exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingReference` if it does not.
    pub async fn require_pet(&self, id: PetId) -> Result<(), AppError> {
        if self.store.pet_exists(id).await? {
            return Ok(());
        }
        debug!(pet_id = %id, "Referenced pet missing");
        Err(AppError::MissingReference(EntityKind::Pet))
    }

    /// Require that a veterinarian exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingReference` if it does not.
    pub async fn require_vet(&self, id: VetId) -> Result<(), AppError> {
        if self.store.vet_exists(id).await? {
            return Ok(());
        }
        debug!(veterinarian_id = %id, "Referenced veterinarian missing");
        Err(AppError::MissingReference(EntityKind::Veterinarian))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, OwnerStore};
    use crate::models::{Address, NewOwner};

    #[tokio::test]
    async fn test_require_owner() {
        let store = MemoryStore::new();
        let owner = store
            .create_owner(&NewOwner {
                first_name: "Jane".to_owned(),
                last_name: "Doe".to_owned(),
                email: vetcare_core::Email::parse("jane@example.com").unwrap(),
                phone: "555-0100".to_owned(),
                address: Address::default(),
            })
            .await
            .unwrap();

        let validator = ReferenceValidator::new(&store);
        assert!(validator.require_owner(owner.id).await.is_ok());
        assert!(matches!(
            validator.require_owner(OwnerId::generate()).await,
            Err(AppError::MissingReference(EntityKind::Owner))
        ));
    }

    #[tokio::test]
    async fn test_require_pet_and_vet_independent() {
        let store = MemoryStore::new();
        let validator = ReferenceValidator::new(&store);
        assert!(matches!(
            validator.require_pet(PetId::generate()).await,
            Err(AppError::MissingReference(EntityKind::Pet))
        ));
        assert!(matches!(
            validator.require_vet(VetId::generate()).await,
            Err(AppError::MissingReference(EntityKind::Veterinarian))
        ));
    }
}

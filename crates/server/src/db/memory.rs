//! In-memory backend.
//!
//! Records live in insertion-ordered vectors behind a single `RwLock`, so
//! every write is atomic with respect to every other operation. Uniqueness
//! and not-found behave exactly as in `PgStore`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vetcare_core::{Email, OwnerId, PetId, VetId, VisitId};

use super::{ClinicStore, OwnerStore, PetStore, RepositoryError, VetStore, VisitStore};
use crate::models::{
    NewOwner, NewPet, NewVet, NewVisit, Owner, OwnerPatch, Pet, PetPatch, VetPatch, Veterinarian,
    Visit, VisitPatch,
};

#[derive(Debug, Default)]
struct Tables {
    owners: Vec<Owner>,
    pets: Vec<Pet>,
    vets: Vec<Veterinarian>,
    visits: Vec<Visit>,
}

impl Tables {
    fn check_owner_unique(
        &self,
        email: &Email,
        skip: Option<OwnerId>,
    ) -> Result<(), RepositoryError> {
        if self
            .owners
            .iter()
            .any(|o| Some(o.id) != skip && &o.email == email)
        {
            return Err(RepositoryError::Conflict("email".to_owned()));
        }
        Ok(())
    }

    fn check_vet_unique(
        &self,
        email: &Email,
        license_number: &str,
        skip: Option<VetId>,
    ) -> Result<(), RepositoryError> {
        let others = || self.vets.iter().filter(|v| Some(v.id) != skip);
        if others().any(|v| &v.email == email) {
            return Err(RepositoryError::Conflict("email".to_owned()));
        }
        if others().any(|v| v.license_number == license_number) {
            return Err(RepositoryError::Conflict("licenseNumber".to_owned()));
        }
        Ok(())
    }
}

/// Clinic storage held in process memory. Data is lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnerStore for MemoryStore {
    async fn list_owners(&self) -> Result<Vec<Owner>, RepositoryError> {
        Ok(self.tables.read().await.owners.clone())
    }

    async fn get_owner(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.owners.iter().find(|o| o.id == id).cloned())
    }

    async fn get_owners(&self, ids: &[OwnerId]) -> Result<Vec<Owner>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .owners
            .iter()
            .filter(|o| ids.contains(&o.id))
            .cloned()
            .collect())
    }

    async fn owner_exists(&self, id: OwnerId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.owners.iter().any(|o| o.id == id))
    }

    async fn create_owner(&self, owner: &NewOwner) -> Result<Owner, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_owner_unique(&owner.email, None)?;

        let now = Utc::now();
        let record = Owner {
            id: OwnerId::generate(),
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            email: owner.email.clone(),
            phone: owner.phone.clone(),
            address: owner.address.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.owners.push(record.clone());
        Ok(record)
    }

    async fn update_owner(
        &self,
        id: OwnerId,
        patch: &OwnerPatch,
    ) -> Result<Owner, RepositoryError> {
        let mut tables = self.tables.write().await;
        let mut updated = tables
            .owners
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        patch.apply(&mut updated);
        tables.check_owner_unique(&updated.email, Some(id))?;
        updated.updated_at = Utc::now();

        if let Some(slot) = tables.owners.iter_mut().find(|o| o.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_owner(&self, id: OwnerId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.owners.len();
        tables.owners.retain(|o| o.id != id);
        if tables.owners.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PetStore for MemoryStore {
    async fn list_pets(&self) -> Result<Vec<Pet>, RepositoryError> {
        Ok(self.tables.read().await.pets.clone())
    }

    async fn list_pets_by_owner(&self, owner: OwnerId) -> Result<Vec<Pet>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pets
            .iter()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect())
    }

    async fn get_pet(&self, id: PetId) -> Result<Option<Pet>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.pets.iter().find(|p| p.id == id).cloned())
    }

    async fn get_pets(&self, ids: &[PetId]) -> Result<Vec<Pet>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pets
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn pet_exists(&self, id: PetId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.pets.iter().any(|p| p.id == id))
    }

    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, RepositoryError> {
        let now = Utc::now();
        let record = Pet {
            id: PetId::generate(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            birth_date: pet.birth_date,
            gender: pet.gender,
            owner: pet.owner,
            medical_history: pet.medical_history.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.pets.push(record.clone());
        Ok(record)
    }

    async fn update_pet(&self, id: PetId, patch: &PetPatch) -> Result<Pet, RepositoryError> {
        let mut tables = self.tables.write().await;
        let pet = tables
            .pets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        patch.apply(pet);
        pet.updated_at = Utc::now();
        Ok(pet.clone())
    }

    async fn delete_pet(&self, id: PetId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.pets.len();
        tables.pets.retain(|p| p.id != id);
        if tables.pets.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl VetStore for MemoryStore {
    async fn list_vets(&self) -> Result<Vec<Veterinarian>, RepositoryError> {
        Ok(self.tables.read().await.vets.clone())
    }

    async fn get_vet(&self, id: VetId) -> Result<Option<Veterinarian>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.vets.iter().find(|v| v.id == id).cloned())
    }

    async fn get_vets(&self, ids: &[VetId]) -> Result<Vec<Veterinarian>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .vets
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn vet_exists(&self, id: VetId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.vets.iter().any(|v| v.id == id))
    }

    async fn create_vet(&self, vet: &NewVet) -> Result<Veterinarian, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_vet_unique(&vet.email, &vet.license_number, None)?;

        let now = Utc::now();
        let record = Veterinarian {
            id: VetId::generate(),
            first_name: vet.first_name.clone(),
            last_name: vet.last_name.clone(),
            specialization: vet.specialization.clone(),
            email: vet.email.clone(),
            phone: vet.phone.clone(),
            license_number: vet.license_number.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.vets.push(record.clone());
        Ok(record)
    }

    async fn update_vet(
        &self,
        id: VetId,
        patch: &VetPatch,
    ) -> Result<Veterinarian, RepositoryError> {
        let mut tables = self.tables.write().await;
        let mut updated = tables
            .vets
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        patch.apply(&mut updated);
        tables.check_vet_unique(&updated.email, &updated.license_number, Some(id))?;
        updated.updated_at = Utc::now();

        if let Some(slot) = tables.vets.iter_mut().find(|v| v.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_vet(&self, id: VetId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.vets.len();
        tables.vets.retain(|v| v.id != id);
        if tables.vets.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl VisitStore for MemoryStore {
    async fn list_visits(&self) -> Result<Vec<Visit>, RepositoryError> {
        Ok(self.tables.read().await.visits.clone())
    }

    async fn list_visits_by_pet(&self, pet: PetId) -> Result<Vec<Visit>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut visits: Vec<Visit> = tables
            .visits
            .iter()
            .filter(|v| v.pet == pet)
            .cloned()
            .collect();
        // Stable, so equal dates keep insertion order.
        visits.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(visits)
    }

    async fn get_visit(&self, id: VisitId) -> Result<Option<Visit>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.visits.iter().find(|v| v.id == id).cloned())
    }

    async fn create_visit(&self, visit: &NewVisit) -> Result<Visit, RepositoryError> {
        let now = Utc::now();
        let record = Visit {
            id: VisitId::generate(),
            pet: visit.pet,
            veterinarian: visit.veterinarian,
            date: visit.date,
            reason: visit.reason.clone(),
            diagnosis: visit.diagnosis.clone(),
            treatment: visit.treatment.clone(),
            notes: visit.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.visits.push(record.clone());
        Ok(record)
    }

    async fn update_visit(
        &self,
        id: VisitId,
        patch: &VisitPatch,
    ) -> Result<Visit, RepositoryError> {
        let mut tables = self.tables.write().await;
        let visit = tables
            .visits
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RepositoryError::NotFound)?;

        patch.apply(visit);
        visit.updated_at = Utc::now();
        Ok(visit.clone())
    }

    async fn delete_visit(&self, id: VisitId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.visits.len();
        tables.visits.retain(|v| v.id != id);
        if tables.visits.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::Address;

    fn new_owner(email: &str) -> NewOwner {
        NewOwner {
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            email: Email::parse(email).unwrap(),
            phone: "555-0100".to_owned(),
            address: Address {
                street: "1 Main St".to_owned(),
                city: "Springfield".to_owned(),
                zip_code: "12345".to_owned(),
            },
        }
    }

    fn new_vet(email: &str, license: &str) -> NewVet {
        NewVet {
            first_name: "James".to_owned(),
            last_name: "Herriot".to_owned(),
            specialization: None,
            email: Email::parse(email).unwrap(),
            phone: "555-0200".to_owned(),
            license_number: license.to_owned(),
        }
    }

    fn new_visit(pet: PetId, vet: VetId, y: i32, m: u32, d: u32) -> NewVisit {
        NewVisit {
            pet,
            veterinarian: vet,
            date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            reason: "Checkup".to_owned(),
            diagnosis: None,
            treatment: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_owner_email_unique() {
        let store = MemoryStore::new();
        store.create_owner(&new_owner("a@example.com")).await.unwrap();
        let err = store
            .create_owner(&new_owner("A@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref f) if f == "email"));
        assert_eq!(store.list_owners().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_owner_update_own_email_is_not_conflict() {
        let store = MemoryStore::new();
        let owner = store.create_owner(&new_owner("a@example.com")).await.unwrap();
        let patch = OwnerPatch {
            email: Some(Email::parse("a@example.com").unwrap()),
            phone: Some("555-0111".to_owned()),
            ..OwnerPatch::default()
        };
        let updated = store.update_owner(owner.id, &patch).await.unwrap();
        assert_eq!(updated.phone, "555-0111");
        assert!(updated.updated_at >= owner.updated_at);
    }

    #[tokio::test]
    async fn test_vet_license_unique() {
        let store = MemoryStore::new();
        let first = store
            .create_vet(&new_vet("a@example.com", "LIC-1"))
            .await
            .unwrap();
        let err = store
            .create_vet(&new_vet("b@example.com", "LIC-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref f) if f == "licenseNumber"));
        assert_eq!(store.get_vet(first.id).await.unwrap().unwrap(), first);
    }

    #[tokio::test]
    async fn test_vet_update_conflict_leaves_record() {
        let store = MemoryStore::new();
        store
            .create_vet(&new_vet("a@example.com", "LIC-1"))
            .await
            .unwrap();
        let second = store
            .create_vet(&new_vet("b@example.com", "LIC-2"))
            .await
            .unwrap();
        let patch = VetPatch {
            license_number: Some("LIC-1".to_owned()),
            ..VetPatch::default()
        };
        assert!(store.update_vet(second.id, &patch).await.is_err());
        let stored = store.get_vet(second.id).await.unwrap().unwrap();
        assert_eq!(stored.license_number, "LIC-2");
    }

    #[tokio::test]
    async fn test_visits_by_pet_date_desc() {
        let store = MemoryStore::new();
        let pet = PetId::generate();
        let vet = VetId::generate();
        for (m, d) in [(1, 1), (6, 1), (3, 1)] {
            store
                .create_visit(&new_visit(pet, vet, 2023, m, d))
                .await
                .unwrap();
        }
        store
            .create_visit(&new_visit(PetId::generate(), vet, 2024, 1, 1))
            .await
            .unwrap();

        let visits = store.list_visits_by_pet(pet).await.unwrap();
        let months: Vec<u32> = visits
            .iter()
            .map(|v| chrono::Datelike::month(&v.date))
            .collect();
        assert_eq!(months, vec![6, 3, 1]);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryStore::new();
        let a = store.create_owner(&new_owner("a@example.com")).await.unwrap();
        let b = store.create_owner(&new_owner("b@example.com")).await.unwrap();
        let ids: Vec<OwnerId> = store
            .list_owners()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_pet(PetId::generate()).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store
                .update_visit(VisitId::generate(), &VisitPatch::default())
                .await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let store = MemoryStore::new();
        let owner = store.create_owner(&new_owner("a@example.com")).await.unwrap();
        let found = store
            .get_owners(&[owner.id, OwnerId::generate()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, owner.id);
    }
}

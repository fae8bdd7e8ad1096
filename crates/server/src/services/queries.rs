//! Read views.
//!
//! Each query loads the primary records, then resolves every distinct
//! reference in one batch lookup per related collection and joins in memory.
//! A reference that does not resolve projects to `None`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::instrument;

use vetcare_core::{OwnerId, PetId, VetId, VisitId};

use crate::db::ClinicStore;
use crate::error::AppError;
use crate::models::{
    DanglingReference, EntityKind, Owner, OwnerSummary, Pet, PetDetail, PetListItem, PetSummary,
    PetView, VetSummary, Veterinarian, Visit, VisitDetail, VisitListItem, VisitView,
};

/// Distinct values in first-seen order.
fn distinct<T: Copy + Eq + Hash>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

/// Named read queries over the clinic store.
pub struct ClinicQueries<'a> {
    store: &'a dyn ClinicStore,
}

impl<'a> ClinicQueries<'a> {
    /// Create a query layer over a store.
    #[must_use]
    pub const fn new(store: &'a dyn ClinicStore) -> Self {
        Self { store }
    }

    async fn owner_summaries(
        &self,
        ids: impl IntoIterator<Item = OwnerId>,
    ) -> Result<HashMap<OwnerId, OwnerSummary>, AppError> {
        let owners = self.store.get_owners(&distinct(ids)).await?;
        Ok(owners.iter().map(|o| (o.id, OwnerSummary::from(o))).collect())
    }

    async fn pets_by_id(
        &self,
        ids: impl IntoIterator<Item = PetId>,
    ) -> Result<HashMap<PetId, Pet>, AppError> {
        let pets = self.store.get_pets(&distinct(ids)).await?;
        Ok(pets.into_iter().map(|p| (p.id, p)).collect())
    }

    async fn vets_by_id(
        &self,
        ids: impl IntoIterator<Item = VetId>,
    ) -> Result<HashMap<VetId, Veterinarian>, AppError> {
        let vets = self.store.get_vets(&distinct(ids)).await?;
        Ok(vets.into_iter().map(|v| (v.id, v)).collect())
    }

    /// Every pet, with owner summaries, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_pets(&self) -> Result<Vec<PetListItem>, AppError> {
        let pets = self.store.list_pets().await?;
        let owners = self.owner_summaries(pets.iter().map(|p| p.owner)).await?;
        Ok(pets
            .into_iter()
            .map(|p| {
                let owner = owners.get(&p.owner).cloned();
                PetView::new(p, owner)
            })
            .collect())
    }

    /// The pets of one owner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the owner does not exist, rather than
    /// an empty list.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn pets_for_owner(&self, owner_id: OwnerId) -> Result<Vec<PetListItem>, AppError> {
        let owner = self
            .store
            .get_owner(owner_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Owner))?;
        let summary = OwnerSummary::from(&owner);

        let pets = self.store.list_pets_by_owner(owner_id).await?;
        Ok(pets
            .into_iter()
            .map(|p| PetView::new(p, Some(summary.clone())))
            .collect())
    }

    /// One pet with its full owner record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the pet does not exist.
    #[instrument(skip(self), fields(pet_id = %id))]
    pub async fn pet_detail(&self, id: PetId) -> Result<PetDetail, AppError> {
        let pet = self
            .store
            .get_pet(id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Pet))?;
        let owner: Option<Owner> = self.store.get_owner(pet.owner).await?;
        Ok(PetView::new(pet, owner))
    }

    /// Project a single pet for a list view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn pet_list_item(&self, pet: Pet) -> Result<PetListItem, AppError> {
        let owner = self.store.get_owner(pet.owner).await?;
        Ok(PetView::new(pet, owner.as_ref().map(OwnerSummary::from)))
    }

    fn join_visits(
        visits: Vec<Visit>,
        pets: &HashMap<PetId, Pet>,
        vets: &HashMap<VetId, Veterinarian>,
    ) -> Vec<VisitListItem> {
        visits
            .into_iter()
            .map(|v| {
                let pet = pets.get(&v.pet).map(PetSummary::from);
                let vet = vets.get(&v.veterinarian).map(VetSummary::from);
                VisitView::new(v, pet, vet)
            })
            .collect()
    }

    /// Every visit, with pet and veterinarian summaries, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_visits(&self) -> Result<Vec<VisitListItem>, AppError> {
        let visits = self.store.list_visits().await?;
        let pets = self.pets_by_id(visits.iter().map(|v| v.pet)).await?;
        let vets = self.vets_by_id(visits.iter().map(|v| v.veterinarian)).await?;
        Ok(Self::join_visits(visits, &pets, &vets))
    }

    /// The visits of one pet, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the pet does not exist, rather than an
    /// empty list.
    #[instrument(skip(self), fields(pet_id = %pet_id))]
    pub async fn visits_for_pet(&self, pet_id: PetId) -> Result<Vec<VisitListItem>, AppError> {
        let pet = self
            .store
            .get_pet(pet_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Pet))?;

        let visits = self.store.list_visits_by_pet(pet_id).await?;
        let vets = self.vets_by_id(visits.iter().map(|v| v.veterinarian)).await?;
        let pets = HashMap::from([(pet.id, pet)]);
        Ok(Self::join_visits(visits, &pets, &vets))
    }

    /// One visit with its full pet and veterinarian records.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the visit does not exist.
    #[instrument(skip(self), fields(visit_id = %id))]
    pub async fn visit_detail(&self, id: VisitId) -> Result<VisitDetail, AppError> {
        let visit = self
            .store
            .get_visit(id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Visit))?;
        let pet = self.store.get_pet(visit.pet).await?;
        let vet = self.store.get_vet(visit.veterinarian).await?;
        Ok(VisitView::new(visit, pet, vet))
    }

    /// Project a single visit for a list view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn visit_list_item(&self, visit: Visit) -> Result<VisitListItem, AppError> {
        let pet = self.store.get_pet(visit.pet).await?;
        let vet = self.store.get_vet(visit.veterinarian).await?;
        Ok(VisitView::new(
            visit,
            pet.as_ref().map(PetSummary::from),
            vet.as_ref().map(VetSummary::from),
        ))
    }

    /// Every stored reference whose target no longer exists.
    ///
    /// Pets are reported first, then visits, each in insertion order. A
    /// visit missing both its pet and its veterinarian is reported twice.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn dangling_references(&self) -> Result<Vec<DanglingReference>, AppError> {
        let pets = self.store.list_pets().await?;
        let visits = self.store.list_visits().await?;

        let owners = self.owner_summaries(pets.iter().map(|p| p.owner)).await?;
        let known_pets = self.pets_by_id(visits.iter().map(|v| v.pet)).await?;
        let known_vets = self.vets_by_id(visits.iter().map(|v| v.veterinarian)).await?;

        let mut dangling: Vec<DanglingReference> = pets
            .iter()
            .filter(|p| !owners.contains_key(&p.owner))
            .map(|p| DanglingReference::PetOwner {
                pet: p.id,
                owner: p.owner,
            })
            .collect();

        for visit in &visits {
            if !known_pets.contains_key(&visit.pet) {
                dangling.push(DanglingReference::VisitPet {
                    visit: visit.id,
                    pet: visit.pet,
                });
            }
            if !known_vets.contains_key(&visit.veterinarian) {
                dangling.push(DanglingReference::VisitVeterinarian {
                    visit: visit.id,
                    veterinarian: visit.veterinarian,
                });
            }
        }
        Ok(dangling)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};

    use vetcare_core::{Email, Gender};

    use super::*;
    use crate::db::{MemoryStore, OwnerStore, PetStore, VetStore, VisitStore};
    use crate::models::{Address, NewOwner, NewPet, NewVet, NewVisit};

    async fn owner(store: &MemoryStore, email: &str) -> Owner {
        store
            .create_owner(&NewOwner {
                first_name: "Jane".to_owned(),
                last_name: "Doe".to_owned(),
                email: Email::parse(email).unwrap(),
                phone: "555-0100".to_owned(),
                address: Address::default(),
            })
            .await
            .unwrap()
    }

    async fn pet(store: &MemoryStore, owner: OwnerId, name: &str) -> Pet {
        store
            .create_pet(&NewPet {
                name: name.to_owned(),
                species: "Cat".to_owned(),
                breed: Some("Tabby".to_owned()),
                birth_date: None,
                gender: Gender::Female,
                owner,
                medical_history: None,
            })
            .await
            .unwrap()
    }

    async fn vet(store: &MemoryStore) -> Veterinarian {
        store
            .create_vet(&NewVet {
                first_name: "James".to_owned(),
                last_name: "Herriot".to_owned(),
                specialization: None,
                email: Email::parse("james@example.com").unwrap(),
                phone: "555-0200".to_owned(),
                license_number: "LIC-1".to_owned(),
            })
            .await
            .unwrap()
    }

    async fn visit(store: &MemoryStore, pet: PetId, vet: VetId, month: u32) -> Visit {
        store
            .create_visit(&NewVisit {
                pet,
                veterinarian: vet,
                date: Utc.with_ymd_and_hms(2023, month, 1, 0, 0, 0).unwrap(),
                reason: "Checkup".to_owned(),
                diagnosis: None,
                treatment: None,
                notes: None,
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        assert_eq!(distinct([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_list_pets_joins_owner_summary() {
        let store = MemoryStore::new();
        let jane = owner(&store, "jane@example.com").await;
        pet(&store, jane.id, "Tom").await;
        pet(&store, OwnerId::generate(), "Stray").await;

        let pets = ClinicQueries::new(&store).list_pets().await.unwrap();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].name, "Tom");
        assert_eq!(pets[0].owner.as_ref().unwrap().first_name, "Jane");
        assert!(pets[1].owner.is_none());
    }

    #[tokio::test]
    async fn test_pets_for_missing_owner_is_not_found() {
        let store = MemoryStore::new();
        let err = ClinicQueries::new(&store)
            .pets_for_owner(OwnerId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(EntityKind::Owner)));
    }

    #[tokio::test]
    async fn test_pets_for_owner_filters() {
        let store = MemoryStore::new();
        let jane = owner(&store, "jane@example.com").await;
        let john = owner(&store, "john@example.com").await;
        pet(&store, jane.id, "Tom").await;
        pet(&store, john.id, "Rex").await;

        let pets = ClinicQueries::new(&store)
            .pets_for_owner(jane.id)
            .await
            .unwrap();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name, "Tom");
    }

    #[tokio::test]
    async fn test_pet_detail_has_full_owner() {
        let store = MemoryStore::new();
        let jane = owner(&store, "jane@example.com").await;
        let tom = pet(&store, jane.id, "Tom").await;
        let detail = ClinicQueries::new(&store).pet_detail(tom.id).await.unwrap();
        assert_eq!(detail.owner.unwrap(), jane);
    }

    #[tokio::test]
    async fn test_visits_for_pet_most_recent_first() {
        let store = MemoryStore::new();
        let jane = owner(&store, "jane@example.com").await;
        let tom = pet(&store, jane.id, "Tom").await;
        let herriot = vet(&store).await;
        for month in [1, 6, 3] {
            visit(&store, tom.id, herriot.id, month).await;
        }

        let visits = ClinicQueries::new(&store)
            .visits_for_pet(tom.id)
            .await
            .unwrap();
        let months: Vec<u32> = visits
            .iter()
            .map(|v| chrono::Datelike::month(&v.date))
            .collect();
        assert_eq!(months, vec![6, 3, 1]);
        assert_eq!(visits[0].pet.as_ref().unwrap().name, "Tom");
        assert_eq!(visits[0].veterinarian.as_ref().unwrap().last_name, "Herriot");
    }

    #[tokio::test]
    async fn test_visit_detail_with_deleted_vet() {
        let store = MemoryStore::new();
        let jane = owner(&store, "jane@example.com").await;
        let tom = pet(&store, jane.id, "Tom").await;
        let herriot = vet(&store).await;
        let v = visit(&store, tom.id, herriot.id, 2).await;
        store.delete_vet(herriot.id).await.unwrap();

        let detail = ClinicQueries::new(&store).visit_detail(v.id).await.unwrap();
        assert_eq!(detail.pet.unwrap(), tom);
        assert!(detail.veterinarian.is_none());
    }

    #[tokio::test]
    async fn test_dangling_references_after_deletes() {
        let store = MemoryStore::new();
        let jane = owner(&store, "jane@example.com").await;
        let tom = pet(&store, jane.id, "Tom").await;
        let herriot = vet(&store).await;
        let v = visit(&store, tom.id, herriot.id, 2).await;

        let queries = ClinicQueries::new(&store);
        assert!(queries.dangling_references().await.unwrap().is_empty());

        store.delete_owner(jane.id).await.unwrap();
        store.delete_pet(tom.id).await.unwrap();

        let dangling = queries.dangling_references().await.unwrap();
        assert_eq!(
            dangling,
            vec![DanglingReference::VisitPet {
                visit: v.id,
                pet: tom.id
            }]
        );
    }
}

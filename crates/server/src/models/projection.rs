//! Read-side projections.
//!
//! A related record is embedded either as a summary (list views) or in full
//! (detail views). A reference whose target no longer exists is rendered as
//! `null`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use vetcare_core::{Gender, OwnerId, PetId, VetId, VisitId};

use super::{Owner, Pet, Veterinarian, Visit};

/// Owner fields shown alongside a pet in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Owner> for OwnerSummary {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id,
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
        }
    }
}

/// Pet fields shown alongside a visit in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSummary {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
}

impl From<&Pet> for PetSummary {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
        }
    }
}

/// Veterinarian fields shown alongside a visit in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VetSummary {
    pub id: VetId,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Veterinarian> for VetSummary {
    fn from(vet: &Veterinarian) -> Self {
        Self {
            id: vet.id,
            first_name: vet.first_name.clone(),
            last_name: vet.last_name.clone(),
        }
    }
}

/// A pet with its owner resolved to `O`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetView<O> {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    /// `None` when the owner no longer exists.
    pub owner: Option<O>,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<O> PetView<O> {
    /// Attach a resolved owner to a pet.
    #[must_use]
    pub fn new(pet: Pet, owner: Option<O>) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            birth_date: pet.birth_date,
            gender: pet.gender,
            owner,
            medical_history: pet.medical_history,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}

/// List view of a pet: owner reduced to its name.
pub type PetListItem = PetView<OwnerSummary>;

/// Detail view of a pet: full owner record.
pub type PetDetail = PetView<Owner>;

/// A visit with its pet resolved to `P` and its veterinarian to `V`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitView<P, V> {
    pub id: VisitId,
    /// `None` when the pet no longer exists.
    pub pet: Option<P>,
    /// `None` when the veterinarian no longer exists.
    pub veterinarian: Option<V>,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<P, V> VisitView<P, V> {
    /// Attach a resolved pet and veterinarian to a visit.
    #[must_use]
    pub fn new(visit: Visit, pet: Option<P>, veterinarian: Option<V>) -> Self {
        Self {
            id: visit.id,
            pet,
            veterinarian,
            date: visit.date,
            reason: visit.reason,
            diagnosis: visit.diagnosis,
            treatment: visit.treatment,
            notes: visit.notes,
            created_at: visit.created_at,
            updated_at: visit.updated_at,
        }
    }
}

/// List view of a visit: pet and veterinarian summaries.
pub type VisitListItem = VisitView<PetSummary, VetSummary>;

/// Detail view of a visit: full pet and veterinarian records.
pub type VisitDetail = VisitView<Pet, Veterinarian>;

/// A stored reference whose target record no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DanglingReference {
    /// A pet whose owner was deleted.
    PetOwner { pet: PetId, owner: OwnerId },
    /// A visit whose pet was deleted.
    VisitPet { visit: VisitId, pet: PetId },
    /// A visit whose veterinarian was deleted.
    VisitVeterinarian { visit: VisitId, veterinarian: VetId },
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PetOwner { pet, owner } => write!(f, "pet {pet} -> missing owner {owner}"),
            Self::VisitPet { visit, pet } => write!(f, "visit {visit} -> missing pet {pet}"),
            Self::VisitVeterinarian {
                visit,
                veterinarian,
            } => write!(f, "visit {visit} -> missing veterinarian {veterinarian}"),
        }
    }
}

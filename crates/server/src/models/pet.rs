//! Pet domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use vetcare_core::{Gender, OwnerId, PetId};

use super::{
    EntityKind, ValidationError, double_option, optional_text, optional_text_change,
    required_change, required_text, required_text_change,
};

const ENTITY: EntityKind = EntityKind::Pet;

/// A pet, belonging to exactly one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique pet ID.
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    /// Owner reference. May dangle if the owner was deleted.
    pub owner: OwnerId,
    pub medical_history: Option<String>,
    /// When the pet was created.
    pub created_at: DateTime<Utc>,
    /// When the pet was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Raw payload for creating a pet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePetInput {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub owner: Option<OwnerId>,
    pub medical_history: Option<String>,
}

impl CreatePetInput {
    /// Trim and validate every field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `name`, `species` or `owner` is missing.
    pub fn validate(&self) -> Result<NewPet, ValidationError> {
        Ok(NewPet {
            name: required_text(ENTITY, "name", &self.name)?,
            species: required_text(ENTITY, "species", &self.species)?,
            breed: optional_text(self.breed.as_deref()),
            birth_date: self.birth_date,
            gender: self.gender.unwrap_or_default(),
            owner: self.owner.ok_or(ValidationError::Required {
                entity: ENTITY,
                field: "owner",
            })?,
            medical_history: optional_text(self.medical_history.as_deref()),
        })
    }
}

/// A validated pet ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub owner: OwnerId,
    pub medical_history: Option<String>,
}

/// Raw payload for updating a pet. Absent fields are left unchanged; an
/// explicit `null` on a required field is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePetInput {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub species: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub breed: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gender: Option<Option<Gender>>,
    #[serde(default, deserialize_with = "double_option")]
    pub owner: Option<Option<OwnerId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub medical_history: Option<Option<String>>,
}

impl UpdatePetInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `name` or `species` is present but blank,
    /// or if a required field is explicitly `null`.
    pub fn validate(&self) -> Result<PetPatch, ValidationError> {
        Ok(PetPatch {
            name: required_text_change(ENTITY, "name", self.name.as_ref().map(Option::as_deref))?,
            species: required_text_change(
                ENTITY,
                "species",
                self.species.as_ref().map(Option::as_deref),
            )?,
            breed: optional_text_change(self.breed.as_ref().map(Option::as_deref)),
            birth_date: self.birth_date,
            gender: required_change(ENTITY, "gender", self.gender)?,
            owner: required_change(ENTITY, "owner", self.owner)?,
            medical_history: optional_text_change(
                self.medical_history.as_ref().map(Option::as_deref),
            ),
        })
    }
}

/// A validated partial update for a pet.
///
/// `owner` is `Some` only when the payload carried it, which is exactly when
/// the owner reference must be re-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<Option<String>>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub gender: Option<Gender>,
    pub owner: Option<OwnerId>,
    pub medical_history: Option<Option<String>>,
}

impl PetPatch {
    /// Merge this patch into an existing pet.
    pub fn apply(&self, pet: &mut Pet) {
        if let Some(v) = &self.name {
            pet.name.clone_from(v);
        }
        if let Some(v) = &self.species {
            pet.species.clone_from(v);
        }
        if let Some(v) = &self.breed {
            pet.breed.clone_from(v);
        }
        if let Some(v) = self.birth_date {
            pet.birth_date = v;
        }
        if let Some(v) = self.gender {
            pet.gender = v;
        }
        if let Some(v) = self.owner {
            pet.owner = v;
        }
        if let Some(v) = &self.medical_history {
            pet.medical_history.clone_from(v);
        }
    }
}

//! Visit domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vetcare_core::{PetId, VetId, VisitId};

use super::{
    EntityKind, ValidationError, double_option, flexible_datetime, optional_text,
    optional_text_change, required_change, required_text, required_text_change,
};

const ENTITY: EntityKind = EntityKind::Visit;

/// A visit of one pet to one veterinarian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    /// Unique visit ID.
    pub id: VisitId,
    /// May dangle if the pet was deleted.
    pub pet: PetId,
    /// May dangle if the veterinarian was deleted.
    pub veterinarian: VetId,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
    /// When the visit was created.
    pub created_at: DateTime<Utc>,
    /// When the visit was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Raw payload for creating a visit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateVisitInput {
    pub pet: Option<PetId>,
    pub veterinarian: Option<VetId>,
    #[serde(default, deserialize_with = "flexible_datetime::deserialize")]
    pub date: Option<DateTime<Utc>>,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

impl CreateVisitInput {
    /// Trim and validate every field. A missing date becomes `now`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `pet`, `veterinarian` or `reason` is
    /// missing.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewVisit, ValidationError> {
        Ok(NewVisit {
            pet: self.pet.ok_or(ValidationError::Required {
                entity: ENTITY,
                field: "pet",
            })?,
            veterinarian: self.veterinarian.ok_or(ValidationError::Required {
                entity: ENTITY,
                field: "veterinarian",
            })?,
            date: self.date.unwrap_or(now),
            reason: required_text(ENTITY, "reason", &self.reason)?,
            diagnosis: optional_text(self.diagnosis.as_deref()),
            treatment: optional_text(self.treatment.as_deref()),
            notes: optional_text(self.notes.as_deref()),
        })
    }
}

/// A validated visit ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub pet: PetId,
    pub veterinarian: VetId,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

/// Raw payload for updating a visit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateVisitInput {
    #[serde(default, deserialize_with = "double_option")]
    pub pet: Option<Option<PetId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub veterinarian: Option<Option<VetId>>,
    #[serde(default, deserialize_with = "flexible_datetime::deserialize_change")]
    pub date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reason: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub diagnosis: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub treatment: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateVisitInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `reason` is present but blank, or if a
    /// required field is explicitly `null`.
    pub fn validate(&self) -> Result<VisitPatch, ValidationError> {
        Ok(VisitPatch {
            pet: required_change(ENTITY, "pet", self.pet)?,
            veterinarian: required_change(ENTITY, "veterinarian", self.veterinarian)?,
            date: required_change(ENTITY, "date", self.date)?,
            reason: required_text_change(
                ENTITY,
                "reason",
                self.reason.as_ref().map(Option::as_deref),
            )?,
            diagnosis: optional_text_change(self.diagnosis.as_ref().map(Option::as_deref)),
            treatment: optional_text_change(self.treatment.as_ref().map(Option::as_deref)),
            notes: optional_text_change(self.notes.as_ref().map(Option::as_deref)),
        })
    }
}

/// A validated partial update for a visit.
///
/// `pet` and `veterinarian` are checked independently; each is re-validated
/// only when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitPatch {
    pub pet: Option<PetId>,
    pub veterinarian: Option<VetId>,
    pub date: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub diagnosis: Option<Option<String>>,
    pub treatment: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl VisitPatch {
    /// Merge this patch into an existing visit.
    pub fn apply(&self, visit: &mut Visit) {
        if let Some(v) = self.pet {
            visit.pet = v;
        }
        if let Some(v) = self.veterinarian {
            visit.veterinarian = v;
        }
        if let Some(v) = self.date {
            visit.date = v;
        }
        if let Some(v) = &self.reason {
            visit.reason.clone_from(v);
        }
        if let Some(v) = &self.diagnosis {
            visit.diagnosis.clone_from(v);
        }
        if let Some(v) = &self.treatment {
            visit.treatment.clone_from(v);
        }
        if let Some(v) = &self.notes {
            visit.notes.clone_from(v);
        }
    }
}

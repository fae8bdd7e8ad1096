//! Veterinarian domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vetcare_core::{Email, VetId};

use super::{
    EntityKind, ValidationError, double_option, optional_text, optional_text_change,
    required_email, required_email_change, required_text, required_text_change,
};

const ENTITY: EntityKind = EntityKind::Veterinarian;

/// A veterinarian working at the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Veterinarian {
    /// Unique veterinarian ID.
    pub id: VetId,
    pub first_name: String,
    pub last_name: String,
    pub specialization: Option<String>,
    /// Unique across veterinarians.
    pub email: Email,
    pub phone: String,
    /// Unique across veterinarians.
    pub license_number: String,
    /// When the veterinarian was created.
    pub created_at: DateTime<Utc>,
    /// When the veterinarian was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Veterinarian {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Raw payload for creating a veterinarian.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateVetInput {
    pub first_name: String,
    pub last_name: String,
    pub specialization: Option<String>,
    pub email: String,
    pub phone: String,
    pub license_number: String,
}

impl CreateVetInput {
    /// Trim and validate every field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a required field is blank or the email
    /// is malformed.
    pub fn validate(&self) -> Result<NewVet, ValidationError> {
        Ok(NewVet {
            first_name: required_text(ENTITY, "firstName", &self.first_name)?,
            last_name: required_text(ENTITY, "lastName", &self.last_name)?,
            specialization: optional_text(self.specialization.as_deref()),
            email: required_email(ENTITY, "email", &self.email)?,
            phone: required_text(ENTITY, "phone", &self.phone)?,
            license_number: required_text(ENTITY, "licenseNumber", &self.license_number)?,
        })
    }
}

/// A validated veterinarian ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVet {
    pub first_name: String,
    pub last_name: String,
    pub specialization: Option<String>,
    pub email: Email,
    pub phone: String,
    pub license_number: String,
}

/// Raw payload for updating a veterinarian.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateVetInput {
    #[serde(default, deserialize_with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub specialization: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub license_number: Option<Option<String>>,
}

impl UpdateVetInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a present field is blank, malformed or
    /// explicitly `null`. A `null` specialization clears it.
    pub fn validate(&self) -> Result<VetPatch, ValidationError> {
        Ok(VetPatch {
            first_name: required_text_change(
                ENTITY,
                "firstName",
                self.first_name.as_ref().map(Option::as_deref),
            )?,
            last_name: required_text_change(
                ENTITY,
                "lastName",
                self.last_name.as_ref().map(Option::as_deref),
            )?,
            specialization: optional_text_change(
                self.specialization.as_ref().map(Option::as_deref),
            ),
            email: required_email_change(
                ENTITY,
                "email",
                self.email.as_ref().map(Option::as_deref),
            )?,
            phone: required_text_change(
                ENTITY,
                "phone",
                self.phone.as_ref().map(Option::as_deref),
            )?,
            license_number: required_text_change(
                ENTITY,
                "licenseNumber",
                self.license_number.as_ref().map(Option::as_deref),
            )?,
        })
    }
}

/// A validated partial update for a veterinarian.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VetPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialization: Option<Option<String>>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}

impl VetPatch {
    /// Merge this patch into an existing veterinarian.
    pub fn apply(&self, vet: &mut Veterinarian) {
        if let Some(v) = &self.first_name {
            vet.first_name.clone_from(v);
        }
        if let Some(v) = &self.last_name {
            vet.last_name.clone_from(v);
        }
        if let Some(v) = &self.specialization {
            vet.specialization.clone_from(v);
        }
        if let Some(v) = &self.email {
            vet.email = v.clone();
        }
        if let Some(v) = &self.phone {
            vet.phone.clone_from(v);
        }
        if let Some(v) = &self.license_number {
            vet.license_number.clone_from(v);
        }
    }
}

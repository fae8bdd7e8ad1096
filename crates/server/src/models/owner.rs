//! Owner domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vetcare_core::{Email, OwnerId};

use super::{
    EntityKind, ValidationError, double_option, required_change, required_email,
    required_email_change, required_text, required_text_change,
};

const ENTITY: EntityKind = EntityKind::Owner;

/// Postal address of an owner. All parts are required.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip_code: String,
}

impl Address {
    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            street: required_text(ENTITY, "address.street", &self.street)?,
            city: required_text(ENTITY, "address.city", &self.city)?,
            zip_code: required_text(ENTITY, "address.zipCode", &self.zip_code)?,
        })
    }
}

/// A pet owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Unique owner ID.
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    /// Unique across owners.
    pub email: Email,
    pub phone: String,
    pub address: Address,
    /// When the owner was created.
    pub created_at: DateTime<Utc>,
    /// When the owner was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Raw payload for creating an owner.
///
/// Missing fields deserialize as blank so that they are reported as
/// "required" by [`CreateOwnerInput::validate`] rather than as a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOwnerInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

impl CreateOwnerInput {
    /// Trim and validate every field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a required field is blank or the email
    /// is malformed.
    pub fn validate(&self) -> Result<NewOwner, ValidationError> {
        Ok(NewOwner {
            first_name: required_text(ENTITY, "firstName", &self.first_name)?,
            last_name: required_text(ENTITY, "lastName", &self.last_name)?,
            email: required_email(ENTITY, "email", &self.email)?,
            phone: required_text(ENTITY, "phone", &self.phone)?,
            address: self.address.validate()?,
        })
    }
}

/// A validated owner ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOwner {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub address: Address,
}

/// Raw payload for updating an owner. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOwnerInput {
    #[serde(default, deserialize_with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    /// Replaces the whole address when present.
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<Address>>,
}

impl UpdateOwnerInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a present field is blank, malformed or
    /// explicitly `null`.
    pub fn validate(&self) -> Result<OwnerPatch, ValidationError> {
        Ok(OwnerPatch {
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
            address: required_change(
                ENTITY,
                "address",
                self.address.as_ref().map(Option::as_ref),
            )?
            .map(Address::validate)
            .transpose()?,
        })
    }
}

/// A validated partial update for an owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

impl OwnerPatch {
    /// Merge this patch into an existing owner.
    pub fn apply(&self, owner: &mut Owner) {
        if let Some(v) = &self.first_name {
            owner.first_name.clone_from(v);
        }
        if let Some(v) = &self.last_name {
            owner.last_name.clone_from(v);
        }
        if let Some(v) = &self.email {
            owner.email = v.clone();
        }
        if let Some(v) = &self.phone {
            owner.phone.clone_from(v);
        }
        if let Some(v) = &self.address {
            owner.address = v.clone();
        }
    }
}

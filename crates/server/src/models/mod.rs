//! Domain models for the clinic.
//!
//! Each entity module defines four shapes:
//!
//! - the stored record (`Owner`, `Pet`, ...), as returned by the store
//! - `Create*Input`, the raw create payload, validated into `New*`
//! - `Update*Input`, the raw update payload (every field optional),
//!   validated into `*Patch`
//!
//! A field that is absent from an update payload stays `None` in the patch
//! and is left untouched by the store. Optional text fields use a double
//! option in patches: `Some(None)` clears the stored value.
//!
//! [`projection`] holds the partial views used when one entity is joined to
//! another in a read.

pub mod owner;
pub mod pet;
pub mod projection;
pub mod vet;
pub mod visit;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use vetcare_core::{Email, EmailError};

pub use owner::{Address, CreateOwnerInput, NewOwner, Owner, OwnerPatch, UpdateOwnerInput};
pub use pet::{CreatePetInput, NewPet, Pet, PetPatch, UpdatePetInput};
pub use projection::{
    DanglingReference, OwnerSummary, PetDetail, PetListItem, PetSummary, PetView, VetSummary,
    VisitDetail, VisitListItem, VisitView,
};
pub use vet::{CreateVetInput, NewVet, UpdateVetInput, VetPatch, Veterinarian};
pub use visit::{CreateVisitInput, NewVisit, UpdateVisitInput, Visit, VisitPatch};

/// The four kinds of record the clinic stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Owner,
    Pet,
    Veterinarian,
    Visit,
}

impl EntityKind {
    /// Human-readable name used in API messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Pet => "Pet",
            Self::Veterinarian => "Veterinarian",
            Self::Visit => "Visit",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure for a create or update payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{entity} validation failed: {field} is required")]
    Required {
        entity: EntityKind,
        field: &'static str,
    },

    /// A field is present but malformed.
    #[error("{entity} validation failed: {field} is invalid ({reason})")]
    Invalid {
        entity: EntityKind,
        field: &'static str,
        reason: String,
    },
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn required_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { entity, field });
    }
    Ok(trimmed.to_owned())
}

/// Reject an explicit `null` on a required field in an update.
///
/// Absent stays `None`; a present value passes through.
pub(crate) fn required_change<T>(
    entity: EntityKind,
    field: &'static str,
    value: Option<Option<T>>,
) -> Result<Option<T>, ValidationError> {
    match value {
        None => Ok(None),
        Some(None) => Err(ValidationError::Required { entity, field }),
        Some(Some(v)) => Ok(Some(v)),
    }
}

/// Trim a required text field that may be absent from an update.
pub(crate) fn required_text_change(
    entity: EntityKind,
    field: &'static str,
    value: Option<Option<&str>>,
) -> Result<Option<String>, ValidationError> {
    required_change(entity, field, value)?
        .map(|v| required_text(entity, field, v))
        .transpose()
}

/// Parse a required email field that may be absent from an update.
pub(crate) fn required_email_change(
    entity: EntityKind,
    field: &'static str,
    value: Option<Option<&str>>,
) -> Result<Option<Email>, ValidationError> {
    required_change(entity, field, value)?
        .map(|v| required_email(entity, field, v))
        .transpose()
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Normalize an optional text change; a blank value clears the field.
pub(crate) fn optional_text_change(value: Option<Option<&str>>) -> Option<Option<String>> {
    value.map(optional_text)
}

/// Parse a required email field.
pub(crate) fn required_email(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<Email, ValidationError> {
    Email::parse(value).map_err(|e| match e {
        EmailError::Empty => ValidationError::Required { entity, field },
        other => ValidationError::Invalid {
            entity,
            field,
            reason: other.to_string(),
        },
    })
}

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: an
/// absent key yields `None`, `null` yields `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Lenient timestamp parsing for visit dates.
///
/// Accepts RFC 3339 (`2023-06-01T09:30:00Z`) or a bare calendar date
/// (`2023-06-01`), which is taken as midnight UTC.
pub(crate) mod flexible_datetime {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, de};

    /// Parse a timestamp string.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|d| d.and_utc())
            })
    }

    /// Deserialize an optional timestamp; `null` and absent both yield `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse(&s).ok_or_else(|| de::Error::custom(format!("invalid date: {s}"))))
            .transpose()
    }

    /// Like [`deserialize`], but keeps an explicit `null` as `Some(None)`.
    ///
    /// Pair with `#[serde(default)]` so an absent key yields `None`.
    pub fn deserialize_change<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}

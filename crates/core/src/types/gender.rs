//! Pet gender.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown gender label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid gender: {0} (expected Male, Female or Unknown)")]
pub struct GenderError(pub String);

/// Recorded gender of a pet.
///
/// Serialized with the exact labels `Male`, `Female` and `Unknown`. Pets
/// created without a gender default to [`Gender::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "vetcare.pet_gender"))]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// The label used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = GenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Unknown" => Ok(Self::Unknown),
            _ => Err(GenderError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(Gender::default(), Gender::Unknown);
    }

    #[test]
    fn test_from_str_roundtrip() {
        for gender in [Gender::Male, Gender::Female, Gender::Unknown] {
            assert_eq!(gender.to_string().parse::<Gender>().unwrap(), gender);
        }
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        assert!("male".parse::<Gender>().is_err());
        assert!("Other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"Female\"");
        let parsed: Gender = serde_json::from_str("\"Male\"").unwrap();
        assert_eq!(parsed, Gender::Male);
        assert!(serde_json::from_str::<Gender>("\"Dragon\"").is_err());
    }
}

//! Seed the clinic database from a YAML fixture.
//!
//! Records are linked by symbolic keys instead of ids, since ids are
//! generated on insert:
//!
//! ```yaml
//! owners:
//!   - key: jane
//!     firstName: Jane
//!     lastName: Doe
//!     email: jane@example.com
//!     phone: 555-0100
//!     address: { street: 1 Main St, city: Springfield, zipCode: "12345" }
//! veterinarians:
//!   - key: house
//!     firstName: Greg
//!     lastName: House
//!     email: house@example.com
//!     phone: 555-0200
//!     licenseNumber: VET-001
//! pets:
//!   - key: rex
//!     ownerKey: jane
//!     name: Rex
//!     species: Dog
//! visits:
//!   - petKey: rex
//!     vetKey: house
//!     date: 2024-03-01
//!     reason: Checkup
//! ```
//!
//! Every record goes through the same services as the API, so field
//! validation, uniqueness and reference checks all apply.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use vetcare_core::{OwnerId, PetId, VetId};
use vetcare_server::db::PgStore;
use vetcare_server::models::{CreateOwnerInput, CreatePetInput, CreateVetInput, CreateVisitInput};
use vetcare_server::services::{OwnerService, PetService, VetService, VisitService};

use super::{CliError, connect};

/// Fixture loaded when `--file` is not given. Absolute, so `vetcare seed` works
/// from any directory of a source checkout.
pub const DEFAULT_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/seed/demo.yaml");

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub owners: Vec<OwnerEntry>,
    pub veterinarians: Vec<VetEntry>,
    pub pets: Vec<PetEntry>,
    pub visits: Vec<VisitEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerEntry {
    pub key: String,
    #[serde(flatten)]
    pub input: CreateOwnerInput,
}

#[derive(Debug, Deserialize)]
pub struct VetEntry {
    pub key: String,
    #[serde(flatten)]
    pub input: CreateVetInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetEntry {
    pub key: String,
    pub owner_key: String,
    #[serde(flatten)]
    pub input: CreatePetInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEntry {
    pub pet_key: String,
    pub vet_key: String,
    #[serde(flatten)]
    pub input: CreateVisitInput,
}

impl Fixture {
    /// Parse a fixture from YAML text.
    pub fn parse(content: &str) -> Result<Self, CliError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check that every symbolic key a pet or visit uses is defined.
    pub fn check_keys(&self) -> Result<(), CliError> {
        let owners: HashSet<&str> = self.owners.iter().map(|o| o.key.as_str()).collect();
        let vets: HashSet<&str> = self.veterinarians.iter().map(|v| v.key.as_str()).collect();
        let pets: HashSet<&str> = self.pets.iter().map(|p| p.key.as_str()).collect();

        let unknown = |kind, key: &str| CliError::UnknownKey {
            kind,
            key: key.to_owned(),
        };

        for pet in &self.pets {
            if !owners.contains(pet.owner_key.as_str()) {
                return Err(unknown("owner", &pet.owner_key));
            }
        }
        for visit in &self.visits {
            if !pets.contains(visit.pet_key.as_str()) {
                return Err(unknown("pet", &visit.pet_key));
            }
            if !vets.contains(visit.vet_key.as_str()) {
                return Err(unknown("veterinarian", &visit.vet_key));
            }
        }
        Ok(())
    }
}

/// Number of records inserted per entity.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub owners: usize,
    pub veterinarians: usize,
    pub pets: usize,
    pub visits: usize,
}

fn resolve<T: Copy>(
    ids: &HashMap<String, T>,
    kind: &'static str,
    key: &str,
) -> Result<T, CliError> {
    ids.get(key).copied().ok_or_else(|| CliError::UnknownKey {
        kind,
        key: key.to_owned(),
    })
}

/// Insert every fixture record, owners and veterinarians first.
pub async fn insert_fixture(
    store: &dyn vetcare_server::db::ClinicStore,
    fixture: &Fixture,
) -> Result<SeedResult, CliError> {
    let mut owner_ids: HashMap<String, OwnerId> = HashMap::new();
    let mut vet_ids: HashMap<String, VetId> = HashMap::new();
    let mut pet_ids: HashMap<String, PetId> = HashMap::new();
    let mut result = SeedResult::default();

    let owners = OwnerService::new(store);
    for entry in &fixture.owners {
        let owner = owners.create(&entry.input).await?;
        owner_ids.insert(entry.key.clone(), owner.id);
        result.owners += 1;
    }

    let vets = VetService::new(store);
    for entry in &fixture.veterinarians {
        let vet = vets.create(&entry.input).await?;
        vet_ids.insert(entry.key.clone(), vet.id);
        result.veterinarians += 1;
    }

    let pets = PetService::new(store);
    for entry in &fixture.pets {
        let mut input = entry.input.clone();
        input.owner = Some(resolve(&owner_ids, "owner", &entry.owner_key)?);
        let pet = pets.create(&input).await?;
        pet_ids.insert(entry.key.clone(), pet.id);
        result.pets += 1;
    }

    let visits = VisitService::new(store);
    for entry in &fixture.visits {
        let mut input = entry.input.clone();
        input.pet = Some(resolve(&pet_ids, "pet", &entry.pet_key)?);
        input.veterinarian = Some(resolve(&vet_ids, "veterinarian", &entry.vet_key)?);
        visits.create(&input).await?;
        result.visits += 1;
    }

    Ok(result)
}

/// Seed the database from `file_path`.
///
/// The fixture is parsed and its keys checked before connecting.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a key is undefined, a
/// record fails validation or the database fails.
pub async fn run(file_path: &str) -> Result<(), CliError> {
    info!(path = %file_path, "Loading fixture");
    let content = tokio::fs::read_to_string(Path::new(file_path))
        .await
        .map_err(|source| CliError::Io {
            path: file_path.to_owned(),
            source,
        })?;

    let fixture = Fixture::parse(&content)?;
    fixture.check_keys()?;
    info!(
        owners = fixture.owners.len(),
        veterinarians = fixture.veterinarians.len(),
        pets = fixture.pets.len(),
        visits = fixture.visits.len(),
        "Fixture validated"
    );

    let pool = connect().await?;
    let store = PgStore::new(pool.clone());

    let result = insert_fixture(&store, &fixture).await?;

    info!("Seeding complete!");
    info!("  Owners inserted: {}", result.owners);
    info!("  Veterinarians inserted: {}", result.veterinarians);
    info!("  Pets inserted: {}", result.pets);
    info!("  Visits inserted: {}", result.visits);

    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vetcare_server::db::{MemoryStore, OwnerStore, PetStore, VisitStore};
    use vetcare_server::error::AppError;

    use super::*;

    const FIXTURE: &str = r#"
owners:
  - key: jane
    firstName: Jane
    lastName: Doe
    email: jane@example.com
    phone: 555-0100
    address: { street: 1 Main St, city: Springfield, zipCode: "12345" }
veterinarians:
  - key: house
    firstName: Greg
    lastName: House
    email: house@example.com
    phone: 555-0200
    licenseNumber: VET-001
pets:
  - key: rex
    ownerKey: jane
    name: Rex
    species: Dog
    gender: Male
visits:
  - petKey: rex
    vetKey: house
    date: 2024-03-01
    reason: Checkup
  - petKey: rex
    vetKey: house
    reason: Vaccination
"#;

    #[test]
    fn test_parse_fixture() {
        let fixture = Fixture::parse(FIXTURE).unwrap();
        assert_eq!(fixture.owners.len(), 1);
        assert_eq!(fixture.pets.first().unwrap().owner_key, "jane");
        assert_eq!(fixture.visits.len(), 2);
        fixture.check_keys().unwrap();
    }

    #[test]
    fn test_unknown_key_rejected() {
        let fixture = Fixture::parse(&FIXTURE.replace("ownerKey: jane", "ownerKey: john")).unwrap();
        let err = fixture.check_keys().unwrap_err();
        assert!(matches!(err, CliError::UnknownKey { kind: "owner", ref key } if key == "john"));
    }

    #[test]
    fn test_default_fixture_path_resolves() {
        let path = std::path::Path::new(DEFAULT_FIXTURE);
        assert!(path.is_absolute());
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, include_str!("../../seed/demo.yaml"));
    }

    #[test]
    fn test_demo_fixture_is_valid() {
        let content = include_str!("../../seed/demo.yaml");
        let fixture = Fixture::parse(content).unwrap();
        fixture.check_keys().unwrap();
        assert!(!fixture.visits.is_empty());
    }

    #[tokio::test]
    async fn test_insert_fixture_links_records() {
        let store = MemoryStore::new();
        let fixture = Fixture::parse(FIXTURE).unwrap();

        let result = insert_fixture(&store, &fixture).await.unwrap();
        assert_eq!(
            result,
            SeedResult {
                owners: 1,
                veterinarians: 1,
                pets: 1,
                visits: 2
            }
        );

        let owner = store.list_owners().await.unwrap().pop().unwrap();
        let pet = store.list_pets().await.unwrap().pop().unwrap();
        assert_eq!(pet.owner, owner.id);
        let visits = store.list_visits_by_pet(pet.id).await.unwrap();
        assert_eq!(visits.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_fixture_applies_validation() {
        let store = MemoryStore::new();
        let fixture = Fixture::parse(&FIXTURE.replace("licenseNumber: VET-001", "")).unwrap();

        let err = insert_fixture(&store, &fixture).await.unwrap_err();
        assert!(matches!(err, CliError::App(AppError::Validation(_))));
    }
}

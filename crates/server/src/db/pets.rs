//! Pet storage.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use vetcare_core::{Gender, OwnerId, PetId};

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::{NewPet, Pet, PetPatch};

/// Storage operations for pets.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// List every pet in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_pets(&self) -> Result<Vec<Pet>, RepositoryError>;

    /// List the pets of one owner in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_pets_by_owner(&self, owner: OwnerId) -> Result<Vec<Pet>, RepositoryError>;

    /// Get a pet by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_pet(&self, id: PetId) -> Result<Option<Pet>, RepositoryError>;

    /// Get every pet whose ID is in `ids`. Missing IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_pets(&self, ids: &[PetId]) -> Result<Vec<Pet>, RepositoryError>;

    /// Check whether a pet exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn pet_exists(&self, id: PetId) -> Result<bool, RepositoryError>;

    /// Insert a new pet. The owner reference is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, RepositoryError>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the pet does not exist.
    async fn update_pet(&self, id: PetId, patch: &PetPatch) -> Result<Pet, RepositoryError>;

    /// Delete a pet. Visits referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the pet does not exist.
    async fn delete_pet(&self, id: PetId) -> Result<(), RepositoryError>;
}

const PET_COLUMNS: &str = "id, name, species, breed, birth_date, gender, owner_id, \
                           medical_history, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PetRow {
    id: PetId,
    name: String,
    species: String,
    breed: Option<String>,
    birth_date: Option<NaiveDate>,
    gender: Gender,
    owner_id: OwnerId,
    medical_history: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PetRow> for Pet {
    fn from(r: PetRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            species: r.species,
            breed: r.breed,
            birth_date: r.birth_date,
            gender: r.gender,
            owner: r.owner_id,
            medical_history: r.medical_history,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl PetStore for PgStore {
    async fn list_pets(&self) -> Result<Vec<Pet>, RepositoryError> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM vetcare.pet ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn list_pets_by_owner(&self, owner: OwnerId) -> Result<Vec<Pet>, RepositoryError> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM vetcare.pet WHERE owner_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn get_pet(&self, id: PetId) -> Result<Option<Pet>, RepositoryError> {
        let row = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM vetcare.pet WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Pet::from))
    }

    async fn get_pets(&self, ids: &[PetId]) -> Result<Vec<Pet>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM vetcare.pet WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn pet_exists(&self, id: PetId) -> Result<bool, RepositoryError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM vetcare.pet WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, RepositoryError> {
        let row = sqlx::query_as::<_, PetRow>(&format!(
            r"
            INSERT INTO vetcare.pet
                (id, name, species, breed, birth_date, gender, owner_id, medical_history,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, clock_timestamp(), clock_timestamp())
            RETURNING {PET_COLUMNS}
            "
        ))
        .bind(PetId::generate())
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(pet.breed.as_deref())
        .bind(pet.birth_date)
        .bind(pet.gender)
        .bind(pet.owner)
        .bind(pet.medical_history.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(Pet::from(row))
    }

    async fn update_pet(&self, id: PetId, patch: &PetPatch) -> Result<Pet, RepositoryError> {
        // Optional columns take a "present" flag so that an explicit clear
        // can be told apart from an absent field.
        let row = sqlx::query_as::<_, PetRow>(&format!(
            r"
            UPDATE vetcare.pet SET
                name = COALESCE($2, name),
                species = COALESCE($3, species),
                breed = CASE WHEN $4 THEN $5 ELSE breed END,
                birth_date = CASE WHEN $6 THEN $7 ELSE birth_date END,
                gender = COALESCE($8, gender),
                owner_id = COALESCE($9, owner_id),
                medical_history = CASE WHEN $10 THEN $11 ELSE medical_history END,
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {PET_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.species.as_deref())
        .bind(patch.breed.is_some())
        .bind(patch.breed.clone().flatten())
        .bind(patch.birth_date.is_some())
        .bind(patch.birth_date.flatten())
        .bind(patch.gender)
        .bind(patch.owner)
        .bind(patch.medical_history.is_some())
        .bind(patch.medical_history.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Pet::from(row))
    }

    async fn delete_pet(&self, id: PetId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vetcare.pet WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

//! Veterinarian storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vetcare_core::{Email, VetId};

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::{NewVet, VetPatch, Veterinarian};

/// Storage operations for veterinarians.
#[async_trait]
pub trait VetStore: Send + Sync {
    /// List every veterinarian in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_vets(&self) -> Result<Vec<Veterinarian>, RepositoryError>;

    /// Get a veterinarian by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_vet(&self, id: VetId) -> Result<Option<Veterinarian>, RepositoryError>;

    /// Get every veterinarian whose ID is in `ids`. Missing IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_vets(&self, ids: &[VetId]) -> Result<Vec<Veterinarian>, RepositoryError>;

    /// Check whether a veterinarian exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn vet_exists(&self, id: VetId) -> Result<bool, RepositoryError>;

    /// Insert a new veterinarian.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or license number is
    /// already taken.
    async fn create_vet(&self, vet: &NewVet) -> Result<Veterinarian, RepositoryError>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the veterinarian does not exist.
    /// Returns `RepositoryError::Conflict` on a uniqueness violation.
    async fn update_vet(&self, id: VetId, patch: &VetPatch)
    -> Result<Veterinarian, RepositoryError>;

    /// Delete a veterinarian. Visits referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the veterinarian does not exist.
    async fn delete_vet(&self, id: VetId) -> Result<(), RepositoryError>;
}

const VET_COLUMNS: &str = "id, first_name, last_name, specialization, email, phone, \
                           license_number, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VetRow {
    id: VetId,
    first_name: String,
    last_name: String,
    specialization: Option<String>,
    email: String,
    phone: String,
    license_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VetRow> for Veterinarian {
    type Error = RepositoryError;

    fn try_from(r: VetRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            specialization: r.specialization,
            email,
            phone: r.phone,
            license_number: r.license_number,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[async_trait]
impl VetStore for PgStore {
    async fn list_vets(&self) -> Result<Vec<Veterinarian>, RepositoryError> {
        let rows = sqlx::query_as::<_, VetRow>(&format!(
            "SELECT {VET_COLUMNS} FROM vetcare.veterinarian ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Veterinarian::try_from).collect()
    }

    async fn get_vet(&self, id: VetId) -> Result<Option<Veterinarian>, RepositoryError> {
        let row = sqlx::query_as::<_, VetRow>(&format!(
            "SELECT {VET_COLUMNS} FROM vetcare.veterinarian WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Veterinarian::try_from).transpose()
    }

    async fn get_vets(&self, ids: &[VetId]) -> Result<Vec<Veterinarian>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, VetRow>(&format!(
            "SELECT {VET_COLUMNS} FROM vetcare.veterinarian WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Veterinarian::try_from).collect()
    }

    async fn vet_exists(&self, id: VetId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM vetcare.veterinarian WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_vet(&self, vet: &NewVet) -> Result<Veterinarian, RepositoryError> {
        let row = sqlx::query_as::<_, VetRow>(&format!(
            r"
            INSERT INTO vetcare.veterinarian
                (id, first_name, last_name, specialization, email, phone, license_number,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, clock_timestamp(), clock_timestamp())
            RETURNING {VET_COLUMNS}
            "
        ))
        .bind(VetId::generate())
        .bind(&vet.first_name)
        .bind(&vet.last_name)
        .bind(vet.specialization.as_deref())
        .bind(vet.email.as_str())
        .bind(&vet.phone)
        .bind(&vet.license_number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Veterinarian::try_from(row)
    }

    async fn update_vet(
        &self,
        id: VetId,
        patch: &VetPatch,
    ) -> Result<Veterinarian, RepositoryError> {
        let row = sqlx::query_as::<_, VetRow>(&format!(
            r"
            UPDATE vetcare.veterinarian SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                specialization = CASE WHEN $4 THEN $5 ELSE specialization END,
                email = COALESCE($6, email),
                phone = COALESCE($7, phone),
                license_number = COALESCE($8, license_number),
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {VET_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.specialization.is_some())
        .bind(patch.specialization.clone().flatten())
        .bind(patch.email.as_ref().map(Email::as_str))
        .bind(patch.phone.as_deref())
        .bind(patch.license_number.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Veterinarian::try_from(row)
    }

    async fn delete_vet(&self, id: VetId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vetcare.veterinarian WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

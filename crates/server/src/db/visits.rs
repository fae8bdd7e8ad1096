//! Visit storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vetcare_core::{PetId, VetId, VisitId};

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::{NewVisit, Visit, VisitPatch};

/// Storage operations for visits.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// List every visit in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_visits(&self) -> Result<Vec<Visit>, RepositoryError>;

    /// List the visits of one pet, most recent `date` first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_visits_by_pet(&self, pet: PetId) -> Result<Vec<Visit>, RepositoryError>;

    /// Get a visit by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_visit(&self, id: VisitId) -> Result<Option<Visit>, RepositoryError>;

    /// Insert a new visit. References are not checked here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    async fn create_visit(&self, visit: &NewVisit) -> Result<Visit, RepositoryError>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the visit does not exist.
    async fn update_visit(&self, id: VisitId, patch: &VisitPatch)
    -> Result<Visit, RepositoryError>;

    /// Delete a visit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the visit does not exist.
    async fn delete_visit(&self, id: VisitId) -> Result<(), RepositoryError>;
}

const VISIT_COLUMNS: &str = "id, pet_id, veterinarian_id, date, reason, diagnosis, treatment, \
                             notes, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VisitRow {
    id: VisitId,
    pet_id: PetId,
    veterinarian_id: VetId,
    date: DateTime<Utc>,
    reason: String,
    diagnosis: Option<String>,
    treatment: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(r: VisitRow) -> Self {
        Self {
            id: r.id,
            pet: r.pet_id,
            veterinarian: r.veterinarian_id,
            date: r.date,
            reason: r.reason,
            diagnosis: r.diagnosis,
            treatment: r.treatment,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl VisitStore for PgStore {
    async fn list_visits(&self) -> Result<Vec<Visit>, RepositoryError> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM vetcare.visit ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn list_visits_by_pet(&self, pet: PetId) -> Result<Vec<Visit>, RepositoryError> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM vetcare.visit WHERE pet_id = $1 \
             ORDER BY date DESC, created_at, id"
        ))
        .bind(pet)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn get_visit(&self, id: VisitId) -> Result<Option<Visit>, RepositoryError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM vetcare.visit WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Visit::from))
    }

    async fn create_visit(&self, visit: &NewVisit) -> Result<Visit, RepositoryError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            r"
            INSERT INTO vetcare.visit
                (id, pet_id, veterinarian_id, date, reason, diagnosis, treatment, notes,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, clock_timestamp(), clock_timestamp())
            RETURNING {VISIT_COLUMNS}
            "
        ))
        .bind(VisitId::generate())
        .bind(visit.pet)
        .bind(visit.veterinarian)
        .bind(visit.date)
        .bind(&visit.reason)
        .bind(visit.diagnosis.as_deref())
        .bind(visit.treatment.as_deref())
        .bind(visit.notes.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(Visit::from(row))
    }

    async fn update_visit(
        &self,
        id: VisitId,
        patch: &VisitPatch,
    ) -> Result<Visit, RepositoryError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            r"
            UPDATE vetcare.visit SET
                pet_id = COALESCE($2, pet_id),
                veterinarian_id = COALESCE($3, veterinarian_id),
                date = COALESCE($4, date),
                reason = COALESCE($5, reason),
                diagnosis = CASE WHEN $6 THEN $7 ELSE diagnosis END,
                treatment = CASE WHEN $8 THEN $9 ELSE treatment END,
                notes = CASE WHEN $10 THEN $11 ELSE notes END,
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {VISIT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.pet)
        .bind(patch.veterinarian)
        .bind(patch.date)
        .bind(patch.reason.as_deref())
        .bind(patch.diagnosis.is_some())
        .bind(patch.diagnosis.clone().flatten())
        .bind(patch.treatment.is_some())
        .bind(patch.treatment.clone().flatten())
        .bind(patch.notes.is_some())
        .bind(patch.notes.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Visit::from(row))
    }

    async fn delete_visit(&self, id: VisitId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vetcare.visit WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

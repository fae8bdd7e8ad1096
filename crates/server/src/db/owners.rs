//! Owner storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vetcare_core::{Email, OwnerId};

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::{Address, NewOwner, Owner, OwnerPatch};

/// Storage operations for owners.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    /// List every owner in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_owners(&self) -> Result<Vec<Owner>, RepositoryError>;

    /// Get an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_owner(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError>;

    /// Get every owner whose ID is in `ids`. Missing IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_owners(&self, ids: &[OwnerId]) -> Result<Vec<Owner>, RepositoryError>;

    /// Check whether an owner exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn owner_exists(&self, id: OwnerId) -> Result<bool, RepositoryError>;

    /// Insert a new owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn create_owner(&self, owner: &NewOwner) -> Result<Owner, RepositoryError>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner does not exist.
    /// Returns `RepositoryError::Conflict` if the new email is already taken.
    async fn update_owner(&self, id: OwnerId, patch: &OwnerPatch)
    -> Result<Owner, RepositoryError>;

    /// Delete an owner. Pets referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner does not exist.
    async fn delete_owner(&self, id: OwnerId) -> Result<(), RepositoryError>;
}

const OWNER_COLUMNS: &str = "id, first_name, last_name, email, phone, street, city, zip_code, \
                             created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OwnerRow {
    id: OwnerId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    street: String,
    city: String,
    zip_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OwnerRow> for Owner {
    type Error = RepositoryError;

    fn try_from(r: OwnerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email,
            phone: r.phone,
            address: Address {
                street: r.street,
                city: r.city,
                zip_code: r.zip_code,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[async_trait]
impl OwnerStore for PgStore {
    async fn list_owners(&self) -> Result<Vec<Owner>, RepositoryError> {
        let rows = sqlx::query_as::<_, OwnerRow>(&format!(
            "SELECT {OWNER_COLUMNS} FROM vetcare.owner ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Owner::try_from).collect()
    }

    async fn get_owner(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        let row = sqlx::query_as::<_, OwnerRow>(&format!(
            "SELECT {OWNER_COLUMNS} FROM vetcare.owner WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Owner::try_from).transpose()
    }

    async fn get_owners(&self, ids: &[OwnerId]) -> Result<Vec<Owner>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, OwnerRow>(&format!(
            "SELECT {OWNER_COLUMNS} FROM vetcare.owner WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Owner::try_from).collect()
    }

    async fn owner_exists(&self, id: OwnerId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM vetcare.owner WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_owner(&self, owner: &NewOwner) -> Result<Owner, RepositoryError> {
        let row = sqlx::query_as::<_, OwnerRow>(&format!(
            r"
            INSERT INTO vetcare.owner
                (id, first_name, last_name, email, phone, street, city, zip_code,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, clock_timestamp(), clock_timestamp())
            RETURNING {OWNER_COLUMNS}
            "
        ))
        .bind(OwnerId::generate())
        .bind(&owner.first_name)
        .bind(&owner.last_name)
        .bind(owner.email.as_str())
        .bind(&owner.phone)
        .bind(&owner.address.street)
        .bind(&owner.address.city)
        .bind(&owner.address.zip_code)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Owner::try_from(row)
    }

    async fn update_owner(
        &self,
        id: OwnerId,
        patch: &OwnerPatch,
    ) -> Result<Owner, RepositoryError> {
        let address = patch.address.as_ref();
        let row = sqlx::query_as::<_, OwnerRow>(&format!(
            r"
            UPDATE vetcare.owner SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                street = COALESCE($6, street),
                city = COALESCE($7, city),
                zip_code = COALESCE($8, zip_code),
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {OWNER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.email.as_ref().map(Email::as_str))
        .bind(patch.phone.as_deref())
        .bind(address.map(|a| a.street.as_str()))
        .bind(address.map(|a| a.city.as_str()))
        .bind(address.map(|a| a.zip_code.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Owner::try_from(row)
    }

    async fn delete_owner(&self, id: OwnerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vetcare.owner WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

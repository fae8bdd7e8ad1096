//! Entity storage.
//!
//! # Database: `vetcare`
//!
//! ## Tables
//!
//! - `owner` - Pet owners (unique email)
//! - `pet` - Pets, `owner_id` references `owner`
//! - `veterinarian` - Veterinarians (unique email and license number)
//! - `visit` - Visits, `pet_id` and `veterinarian_id` reference `pet` and
//!   `veterinarian`
//!
//! References are plain UUID columns with no database-level foreign key, so
//! deleting a record never cascades to, or is blocked by, the records that
//! point at it.
//!
//! # Backends
//!
//! Each entity has a storage trait ([`OwnerStore`], [`PetStore`],
//! [`VetStore`], [`VisitStore`]); [`ClinicStore`] combines them with
//! lifecycle hooks. [`PgStore`] is the production backend, [`MemoryStore`]
//! backs tests and local development.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p vetcare-cli -- migrate
//! ```

pub mod memory;
pub mod owners;
pub mod pets;
pub mod postgres;
pub mod vets;
pub mod visits;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryStore;
pub use owners::OwnerStore;
pub use pets::PetStore;
pub use postgres::PgStore;
pub use vets::VetStore;
pub use visits::VisitStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation. Holds the API name of the field.
    #[error("duplicate value for {0}")]
    Conflict(String),
}

/// Storage for every clinic entity, plus connection lifecycle.
#[async_trait]
pub trait ClinicStore: OwnerStore + PetStore + VetStore + VisitStore {
    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the backend cannot be reached.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Release backend resources. Called once on shutdown.
    async fn close(&self);
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a write error, turning unique violations into `Conflict`.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(conflict_field(db_err.constraint()).to_owned());
    }
    RepositoryError::Database(e)
}

/// API field name for a unique constraint.
fn conflict_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("owner_email_key" | "veterinarian_email_key") => "email",
        Some("veterinarian_license_number_key") => "licenseNumber",
        _ => "id",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_field_names() {
        assert_eq!(conflict_field(Some("owner_email_key")), "email");
        assert_eq!(conflict_field(Some("veterinarian_email_key")), "email");
        assert_eq!(
            conflict_field(Some("veterinarian_license_number_key")),
            "licenseNumber"
        );
        assert_eq!(conflict_field(Some("pet_pkey")), "id");
    }

    #[test]
    fn test_conflict_display() {
        let err = RepositoryError::Conflict("licenseNumber".to_owned());
        assert_eq!(err.to_string(), "duplicate value for licenseNumber");
    }
}

//! `PostgreSQL` backend.
//!
//! The per-entity trait impls live next to their traits in `owners`, `pets`,
//! `vets` and `visits`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ClinicStore, RepositoryError};

/// Clinic storage backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

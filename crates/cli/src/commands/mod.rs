//! CLI command implementations.

pub mod audit;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use vetcare_server::db;
use vetcare_server::error::AppError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Fixture file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Fixture file is not valid YAML for the expected shape.
    #[error("Invalid fixture: {0}")]
    Fixture(#[from] serde_yaml::Error),

    /// A fixture entry uses a key that was never defined.
    #[error("Unknown {kind} key in fixture: {key}")]
    UnknownKey { kind: &'static str, key: String },

    /// A write or query was rejected.
    #[error(transparent)]
    App(#[from] AppError),

    /// Audit found dangling references in strict mode.
    #[error("{0} dangling reference(s) found")]
    Dangling(usize),
}

/// Connect to the clinic database named by `VETCARE_DATABASE_URL`, falling
/// back to `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("VETCARE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("VETCARE_DATABASE_URL"))?;

    tracing::info!("Connecting to clinic database...");
    Ok(db::create_pool(&database_url).await?)
}

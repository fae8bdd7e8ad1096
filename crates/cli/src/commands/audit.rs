//! Referential integrity audit.
//!
//! Deletes never cascade, so pets can outlive their owner and visits can
//! outlive their pet or veterinarian. This command lists those records.
//!
//! # Usage
//!
//! ```bash
//! vetcare audit            # report only
//! vetcare audit --strict   # exit 1 when anything is dangling
//! ```

use tracing::{info, warn};

use vetcare_server::db::PgStore;
use vetcare_server::services::ClinicQueries;

use super::{CliError, connect};

/// Print every dangling reference.
///
/// # Errors
///
/// Returns an error if the database fails, or `CliError::Dangling` when
/// `strict` is set and at least one reference dangles.
pub async fn run(strict: bool) -> Result<(), CliError> {
    let pool = connect().await?;
    let store = PgStore::new(pool.clone());

    let dangling = ClinicQueries::new(&store).dangling_references().await?;
    pool.close().await;

    if dangling.is_empty() {
        info!("No dangling references found");
        return Ok(());
    }

    warn!(count = dangling.len(), "Dangling references found");
    for reference in &dangling {
        warn!("  - {reference}");
    }

    if strict {
        return Err(CliError::Dangling(dangling.len()));
    }
    Ok(())
}

//! VetCare CLI - Database migrations, fixtures and integrity audits.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! vetcare migrate
//!
//! # Load the demo fixture (or any YAML fixture)
//! vetcare seed
//! vetcare seed --file path/to/clinic.yaml
//!
//! # List pets and visits whose references no longer resolve
//! vetcare audit
//! vetcare audit --strict
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert owners, veterinarians, pets and visits from YAML
//! - `audit` - Report dangling references

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "vetcare")]
#[command(author, version, about = "VetCare 360 CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from a YAML fixture
    Seed {
        /// Fixture file
        #[arg(short, long, default_value = commands::seed::DEFAULT_FIXTURE)]
        file: String,
    },
    /// Report pets and visits that reference deleted records
    Audit {
        /// Exit with an error when any dangling reference is found
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::Audit { strict } => commands::audit::run(strict).await?,
    }
    Ok(())
}

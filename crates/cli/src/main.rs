//! Dora Pâtisserie CLI - migrations and operational management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! dora-cli migrate
//!
//! # Seed the catalog and the weekly schedule
//! dora-cli seed
//!
//! # Grant or revoke the owner role
//! dora-cli owner grant -e dora@example.com
//! dora-cli owner revoke -e dora@example.com
//! ```
//!
//! The owner role is only ever granted here: the public signup path always
//! produces customer accounts.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dora-cli")]
#[command(author, version, about = "Dora Pâtisserie CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog and working hours with starter data
    Seed,
    /// Manage the owner role
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Grant the owner role to an existing account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the owner role, demoting the account to customer
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Owner { action } => match action {
            OwnerAction::Grant { email } => {
                commands::owner::set_role(&email, dora_patisserie_core::UserRole::Owner).await?;
            }
            OwnerAction::Revoke { email } => {
                commands::owner::set_role(&email, dora_patisserie_core::UserRole::Customer).await?;
            }
        },
    }
    Ok(())
}

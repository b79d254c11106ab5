//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time, so this binary carries everything it needs. The server
//! never runs them on startup; schema changes are an explicit operation.

use super::{CliError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

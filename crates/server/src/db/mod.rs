//! Database access for the bakery's `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` / `profiles` - accounts and their role-bearing profiles
//! - `products` - the catalog
//! - `orders` / `order_items` - orders with denormalized line-item snapshots
//! - `working_hours` - one row per weekday
//! - `session` - tower-sessions store (created by the session layer)
//!
//! Repositories are plain structs borrowing the pool, constructed at the
//! call site; there is no process-wide database handle. Queries are
//! runtime-bound so the crate compiles without a live database.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p dora-patisserie-cli -- migrate
//! ```

pub mod orders;
pub mod products;
pub mod profiles;
pub mod users;
pub mod working_hours;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use profiles::ProfileRepository;
pub use users::UserRepository;
pub use working_hours::WorkingHourRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Input rejected before reaching the database.
    #[error("{0}")]
    Validation(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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

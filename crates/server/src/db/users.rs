//! User repository: accounts and their password credentials.
//!
//! A user and its profile are one-to-one and share an id; signup creates
//! both in a single transaction so an account can never exist without the
//! role-bearing profile the access gate depends on.

use sqlx::PgPool;

use dora_patisserie_core::{Email, UserId};

use super::RepositoryError;
use crate::models::Profile;

/// Repository for account rows.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user with a password hash, plus its customer profile, in
    /// one transaction. The profile inherits the contact name and email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<Profile, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, name, email) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(name)
        .bind(email.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(profile)
    }

    /// Look up a user's id and password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(UserId, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (UserId, String)>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}

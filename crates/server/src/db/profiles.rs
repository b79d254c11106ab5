//! Profile repository.

use sqlx::PgPool;

use dora_patisserie_core::UserId;

use super::RepositoryError;
use crate::models::{Profile, ProfileUpdate};

/// Repository for profiles.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up the profile for an identity, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(profile)
    }

    /// Self-service update of the profile's contact fields. The role is not
    /// writable through this path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile does not exist.
    pub async fn update(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        let mut builder = sqlx::QueryBuilder::new("UPDATE profiles SET updated_at = NOW()");
        if let Some(name) = &update.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(phone) = &update.phone {
            builder.push(", phone = ").push_bind(phone);
        }
        if let Some(email) = &update.email {
            builder.push(", email = ").push_bind(email);
        }
        if let Some(address) = &update.address {
            builder.push(", address = ").push_bind(address);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Profile>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

//! Working-hours repository.

use sqlx::PgPool;

use dora_patisserie_core::WorkingHourId;

use super::RepositoryError;
use crate::models::{WorkingHour, WorkingHourUpdate};

/// Repository for the weekly opening schedule.
pub struct WorkingHourRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkingHourRepository<'a> {
    /// Create a new working-hours repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the schedule ordered by day of week (0 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<WorkingHour>, RepositoryError> {
        let hours = sqlx::query_as::<_, WorkingHour>(
            "SELECT * FROM working_hours ORDER BY day_of_week",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(hours)
    }

    /// Sparse update of one day's schedule.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn update(
        &self,
        id: WorkingHourId,
        update: WorkingHourUpdate,
    ) -> Result<WorkingHour, RepositoryError> {
        let mut builder = update_query(id, &update);

        builder
            .build_query_as::<WorkingHour>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

/// Build the sparse update. `updated_at` is always written, so the statement
/// stays valid SQL even when no fields were supplied.
fn update_query(
    id: WorkingHourId,
    update: &WorkingHourUpdate,
) -> sqlx::QueryBuilder<'static, sqlx::Postgres> {
    let mut builder = sqlx::QueryBuilder::new("UPDATE working_hours SET updated_at = NOW()");
    if let Some(open_time) = update.open_time {
        builder.push(", open_time = ").push_bind(open_time);
    }
    if let Some(close_time) = update.close_time {
        builder.push(", close_time = ").push_bind(close_time);
    }
    if let Some(is_closed) = update.is_closed {
        builder.push(", is_closed = ").push_bind(is_closed);
    }
    builder.push(" WHERE id = ").push_bind(id);
    builder.push(" RETURNING *");
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_touches_only_the_timestamp() {
        let mut query = update_query(WorkingHourId::generate(), &WorkingHourUpdate::default());
        assert_eq!(
            query.sql(),
            "UPDATE working_hours SET updated_at = NOW() WHERE id = $1 RETURNING *"
        );
    }

    #[test]
    fn supplied_fields_are_written_alongside_the_timestamp() {
        let update = WorkingHourUpdate {
            is_closed: Some(true),
            ..WorkingHourUpdate::default()
        };
        let mut query = update_query(WorkingHourId::generate(), &update);
        assert_eq!(
            query.sql(),
            "UPDATE working_hours SET updated_at = NOW(), is_closed = $1 \
             WHERE id = $2 RETURNING *"
        );
    }
}

//! Working-hours route handlers.
//!
//! The schedule is one row per weekday (0 = Sunday). Rows are seeded
//! operationally and only ever updated, never created or deleted through
//! the HTTP surface, so the set of days stays fixed.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use dora_patisserie_core::WorkingHourId;

use crate::db::WorkingHourRepository;
use crate::error::AppError;
use crate::models::WorkingHourUpdate;
use crate::state::AppState;

/// List the weekly schedule ordered by day.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let hours = WorkingHourRepository::new(state.pool())
        .list()
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch working hours", "Working hours", e))?;

    Ok(Json(hours))
}

/// Sparse update of one day's schedule.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<WorkingHourId>,
    Json(body): Json<WorkingHourUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let hours = WorkingHourRepository::new(state.pool())
        .update(id, body)
        .await
        .map_err(|e| AppError::from_repo("Failed to update working hours", "Working hours", e))?;

    Ok(Json(hours))
}

//! Working-hours types.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use dora_patisserie_core::WorkingHourId;

/// One day's opening schedule. One row is expected per weekday (0 = Sunday);
/// absence of rows is a valid, if degenerate, state.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WorkingHour {
    pub id: WorkingHourId,
    pub day_of_week: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse update of one day's schedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkingHourUpdate {
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: Option<bool>,
}

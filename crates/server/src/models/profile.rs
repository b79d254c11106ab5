//! Profile types.
//!
//! A profile row shares its id with the account (one-to-one) and carries the
//! role the access-control gate dispatches on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dora_patisserie_core::{UserId, UserRole};

/// A profile row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: UserId,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Self-service profile update. The role is deliberately absent: it is only
/// ever changed operationally (CLI), never through the HTTP surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

//! Customer account route handlers.
//!
//! Behind the gate's customer rule, so every caller here is authenticated.
//! The view data is the caller's own profile and orders; there is no way to
//! reach another account's data through these paths.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::db::{OrderRepository, ProfileRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{Order, Profile, ProfileUpdate};
use crate::state::AppState;

/// Account page data: the caller's profile and order history.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub profile: Profile,
    pub orders: Vec<Order>,
}

/// Serve the account page data.
pub async fn page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let profile = ProfileRepository::new(state.pool())
        .get(user.id)
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch profile", "Profile", e))?
        .ok_or(AppError::NotFound("Profile"))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch orders", "Order", e))?;

    Ok(Json(AccountView { profile, orders }))
}

/// Self-service profile update. The role is not writable here.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let profile = ProfileRepository::new(state.pool())
        .update(user.id, body)
        .await
        .map_err(|e| AppError::from_repo("Failed to update profile", "Profile", e))?;

    Ok(Json(profile))
}

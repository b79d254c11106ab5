//! Authentication route handlers.
//!
//! Password signup, login, and logout. Signup always produces a customer
//! account; the owner role is granted operationally, never here. The gate
//! already bounces authenticated callers off `/login` and `/signup`, so the
//! GET handlers only ever see anonymous requests.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use dora_patisserie_core::Email;

use crate::error::AppError;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The `redirect` target carried through the auth-entry pages.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

/// Auth-entry page data. Echoes the return target so the client form can
/// carry it through the POST round trip.
pub async fn login_page(Query(query): Query<RedirectQuery>) -> impl IntoResponse {
    Json(json!({ "redirect": query.redirect }))
}

/// Signup page data.
pub async fn signup_page(Query(query): Query<RedirectQuery>) -> impl IntoResponse {
    Json(json!({ "redirect": query.redirect }))
}

/// Create a customer account and log it in.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = AuthService::new(state.pool());
    let profile = auth
        .register(&body.email, &body.password, body.name.as_deref())
        .await?;

    // The profile email is the parsed form of what the caller sent, so it
    // is present and valid here.
    let email = Email::parse(profile.email.as_deref().unwrap_or(body.email.as_str()))
        .map_err(|e| AppError::Internal(format!("profile email invalid after signup: {e}")))?;

    let user = CurrentUser {
        id: profile.id,
        email,
    };
    set_current_user(&session, &user).await?;

    tracing::info!(user_id = %profile.id, "account created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = AuthService::new(state.pool());
    let (user_id, email) = auth.login(&body.email, &body.password).await?;

    // Fresh session id on privilege change.
    session.cycle_id().await?;

    let user = CurrentUser {
        id: user_id,
        email,
    };
    set_current_user(&session, &user).await?;

    tracing::info!(user_id = %user_id, "login");
    Ok(Json(user))
}

/// Log out: drop the user and destroy the whole session, cart included.
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    clear_current_user(&session).await?;
    session.flush().await?;

    Ok(StatusCode::NO_CONTENT)
}

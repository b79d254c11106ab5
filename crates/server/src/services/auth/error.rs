//! Authentication error types.

use thiserror::Error;

use dora_patisserie_core::EmailError;

use crate::db::RepositoryError;
use crate::services::auth::MIN_PASSWORD_LENGTH;

/// Errors from signup and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email address is structurally invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password does not meet the minimum requirements.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// Wrong email or password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

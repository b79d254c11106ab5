//! Unified error handling for the HTTP surface.
//!
//! Taxonomy: validation failures are 4xx with a human-readable message,
//! missing ids are 404, and gateway (database) failures are 500 with a
//! generic per-operation message. Internal detail is logged server-side
//! only and never leaked to the client - including on the order-creation
//! path, which gets no special treatment.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input shape or empty required fields.
    #[error("{0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller lacks permission.
    #[error("Forbidden")]
    Forbidden,

    /// The persistence gateway was unreachable or rejected the operation.
    /// `action` is the generic client-facing message ("Failed to fetch
    /// orders"); the source carries the real detail for the log.
    #[error("{action}")]
    Gateway {
        action: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Session store failure.
    #[error("Session error")]
    Session(#[from] tower_sessions::session::Error),

    /// Anything else that should read as a server fault.
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Map a repository error for one operation: validation and not-found
    /// keep their meaning, everything else collapses into a gateway error
    /// with the given generic message.
    pub fn from_repo(action: &'static str, entity: &'static str, source: RepositoryError) -> Self {
        match source {
            RepositoryError::NotFound => Self::NotFound(entity),
            RepositoryError::Validation(message) => Self::Validation(message),
            source => Self::Gateway { action, source },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword => Self::Validation(
                "password must be at least 8 characters".to_owned(),
            ),
            AuthError::UserAlreadyExists => {
                Self::Validation("an account with this email already exists".to_owned())
            }
            AuthError::InvalidCredentials => Self::Unauthorized,
            AuthError::Hash(detail) => Self::Internal(detail),
            AuthError::Repository(source) => Self::Gateway {
                action: "Authentication failed",
                source,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server faults get logged with full detail before being flattened
        // into a generic message.
        match &self {
            Self::Gateway { action, source } => {
                tracing::error!(error = %source, "{action}");
            }
            Self::Session(source) => {
                tracing::error!(error = %source, "session store failure");
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
            }
            _ => {}
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Gateway { .. } | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal detail never reaches the client; the Display impl of the
        // internal variants is already generic.
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn errors_map_to_expected_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("order must contain at least one item".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::NotFound("Order")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::Internal("pool exhausted".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn gateway_error_shows_only_the_generic_action() {
        let err = AppError::from_repo(
            "Failed to fetch orders",
            "Order",
            RepositoryError::Database(sqlx::Error::PoolClosed),
        );
        assert_eq!(err.to_string(), "Failed to fetch orders");
    }

    #[test]
    fn from_repo_preserves_not_found_and_validation() {
        let err = AppError::from_repo("Failed to fetch order", "Order", RepositoryError::NotFound);
        assert!(matches!(err, AppError::NotFound("Order")));

        let err = AppError::from_repo(
            "Failed to create order",
            "Order",
            RepositoryError::Validation("item quantity must be positive".into()),
        );
        assert!(matches!(err, AppError::Validation(_)));
    }
}

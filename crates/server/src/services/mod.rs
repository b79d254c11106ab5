//! Application services.

pub mod auth;
pub mod changes;

pub use auth::{AuthError, AuthService};

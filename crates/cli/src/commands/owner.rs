//! Owner role management.
//!
//! The HTTP surface never writes roles; the only way an account becomes an
//! owner (or stops being one) is this command.

use dora_patisserie_core::UserRole;

use super::{CliError, connect};

/// Set the role on the profile belonging to the given account email.
pub async fn set_role(email: &str, role: UserRole) -> Result<(), CliError> {
    let pool = connect().await?;

    let result = sqlx::query(
        "UPDATE profiles SET role = $1, updated_at = NOW()
         WHERE id = (SELECT id FROM users WHERE email = $2)",
    )
    .bind(role)
    .bind(email)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::Invalid(format!("no account found for {email}")));
    }

    tracing::info!("{email} is now a {role}");
    Ok(())
}

//! Admin account bootstrap.

use anyhow::{Context, bail};
use rollbook_core::hash_password;
use rollbook_models::{RegisterRequest, UserRole};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Creates an admin account. Fails if the e-mail is already taken
/// (case-insensitively) or the fields do not pass registration rules.
pub async fn create_admin(
    db: &PgPool,
    display_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let request = RegisterRequest {
        display_name: display_name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        role: Some(UserRole::Admin),
        department: None,
        position: None,
        phone_number: None,
    };
    request.validate().context("Invalid admin details")?;

    let hashed_password = hash_password(&request.password)?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (display_name, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT ((LOWER(email))) DO NOTHING
         RETURNING id",
    )
    .bind(&request.display_name)
    .bind(&request.email)
    .bind(&hashed_password)
    .bind(UserRole::Admin)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    match id {
        Some(id) => Ok(id),
        None => bail!("User with this email already exists"),
    }
}

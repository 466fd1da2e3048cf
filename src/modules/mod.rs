pub mod auth;
pub mod export;
pub mod health;
pub mod students;
pub mod users;

use rollbook_core::AppError;
use uuid::Uuid;

/// Parses a path ID. Malformed IDs cannot match any record, so they are
/// reported as not found.
pub(crate) fn parse_id(entity: &'static str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(entity, raw))
}

/// Postgres `unique_violation` (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

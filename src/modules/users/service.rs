use anyhow::Context;
use rollbook_core::{AppError, hash_password};
use rollbook_models::{UpdateUserDto, User, UserRole};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::is_unique_violation;

/// Columns of [`User`]; the password hash is never selected with them.
pub(crate) const USER_COLUMNS: &str = "id, display_name, email, role, department, position, \
     phone_number, created_by, created_at, updated_at";

/// Maps an insert/update failure, turning e-mail collisions into `DuplicateEmail`.
pub(crate) fn map_write_error(err: sqlx::Error, context: &'static str) -> AppError {
    if is_unique_violation(&err) {
        AppError::DuplicateEmail
    } else {
        AppError::storage(anyhow::Error::new(err).context(context))
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::storage)
    }

    #[instrument(skip(db))]
    pub async fn get_users_by_role(db: &PgPool, role: UserRole) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at DESC, id"
        ))
        .bind(role)
        .fetch_all(db)
        .await
        .context("Failed to fetch users by role")
        .map_err(AppError::storage)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user")
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    /// Locks every admin row and returns their IDs. Held until the
    /// transaction ends, so concurrent demotions/deletions serialize.
    async fn lock_admins(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Uuid>, AppError> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = 'admin' ORDER BY id FOR UPDATE")
            .fetch_all(&mut **tx)
            .await
            .context("Failed to lock admin rows")
            .map_err(AppError::storage)
    }

    /// Applies a partial update. Removing the admin role from the last admin
    /// fails with `LastAdmin`.
    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let password = match dto.password.as_deref() {
            Some(plain) => Some(hash_password(plain)?),
            None => None,
        };

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::storage)?;

        if dto.role.is_some_and(|role| role != UserRole::Admin) {
            let admins = Self::lock_admins(&mut tx).await?;
            if admins == [id] {
                return Err(AppError::LastAdmin);
            }
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                display_name = COALESCE($2, display_name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                department = COALESCE($5, department),
                position = COALESCE($6, position),
                phone_number = COALESCE($7, phone_number),
                password = COALESCE($8, password),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.display_name)
        .bind(dto.email)
        .bind(dto.role)
        .bind(dto.department)
        .bind(dto.position)
        .bind(dto.phone_number)
        .bind(password)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))?
        .ok_or_else(|| AppError::not_found("User", id))?;

        tx.commit()
            .await
            .context("Failed to commit user update")
            .map_err(AppError::storage)?;

        Ok(user)
    }

    /// Deletes a user. The last remaining admin cannot be deleted.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::storage)?;

        let admins = Self::lock_admins(&mut tx).await?;

        let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch user")
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::not_found("User", id))?;

        if role == UserRole::Admin && admins.len() <= 1 {
            return Err(AppError::LastAdmin);
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user")
            .map_err(AppError::storage)?;

        tx.commit()
            .await
            .context("Failed to commit user deletion")
            .map_err(AppError::storage)?;

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

use anyhow::Context;
use rollbook_auth::create_access_token;
use rollbook_config::JwtConfig;
use rollbook_core::{AppError, hash_password, verify_password};
use rollbook_models::{LoginRequest, RegisterRequest, User, UserRole};
use rollbook_observability::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::users::service::{USER_COLUMNS, map_write_error};

#[derive(FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

pub struct AuthService;

impl AuthService {
    /// Creates an account with `role`. E-mail uniqueness is case-insensitive.
    #[instrument(skip(db, dto))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequest,
        role: UserRole,
        created_by: Option<Uuid>,
    ) -> Result<User, AppError> {
        let password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (display_name, email, role, password, department, position, phone_number, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&dto.display_name)
        .bind(&dto.email)
        .bind(role)
        .bind(password)
        .bind(&dto.department)
        .bind(&dto.position)
        .bind(&dto.phone_number)
        .bind(created_by)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, "Failed to insert user"))?;

        track_user_registered(role.as_str());
        info!(user_id = %user.id, role = %role, "User registered");
        Ok(user)
    }

    /// Verifies credentials and signs an access token. Unknown e-mail and
    /// wrong password are indistinguishable to the caller.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(String, User), AppError> {
        let found = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user for login")
        .map_err(AppError::storage)?;

        let Some(UserWithPassword { user, password }) = found else {
            track_user_login_failure("unknown_email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&dto.password, &password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::InvalidCredentials);
        }

        let token = create_access_token(user.id, &user.email, user.role.as_str(), jwt_config)?;
        track_jwt_issued();
        track_user_login_success(user.role.as_str());

        Ok((token, user))
    }
}

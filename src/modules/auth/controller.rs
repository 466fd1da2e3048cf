use axum::{Json, extract::State, http::StatusCode};
use rollbook_core::AppError;
use rollbook_models::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse, UserRole,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Error envelope returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Offending field, for validation errors
    pub field: Option<String>,
}

/// Register a new user
///
/// Public. The account is created as `staff` unless the request carries an
/// admin token, in which case the requested role is used.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Validation error or email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, caller, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let admin = caller.filter(AuthUser::is_admin);

    let (role, created_by) = match &admin {
        Some(admin) => (dto.role.unwrap_or_default(), Some(admin.user_id()?)),
        None => (UserRole::Staff, None),
    };

    let user = AuthService::register_user(&state.db, dto, role, created_by).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            user,
        }),
    ))
}

/// Login and receive a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (token, user) = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let user = UserService::get_user(&state.db, user_id).await?;
    Ok(Json(UserResponse {
        success: true,
        data: user,
    }))
}

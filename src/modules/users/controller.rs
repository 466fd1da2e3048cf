use axum::{
    Json,
    extract::{Path, State},
};
use rollbook_core::AppError;
use rollbook_models::{
    DeletedResponse, UpdateUserDto, UserListResponse, UserResponse, UserRole,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::parse_id;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _admin))]
pub async fn get_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<UserListResponse>, AppError> {
    let users = UserService::get_users(&state.db).await?;
    Ok(Json(UserListResponse {
        success: true,
        count: users.len(),
        data: users,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/role/{role}",
    params(("role" = String, Path, description = "admin, teacher or staff")),
    responses(
        (status = 200, description = "Users holding the role", body = UserListResponse),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _admin))]
pub async fn get_users_by_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(role): Path<String>,
) -> Result<Json<UserListResponse>, AppError> {
    let role: UserRole = role.parse()?;
    let users = UserService::get_users_by_role(&state.db, role).await?;
    Ok(Json(UserListResponse {
        success: true,
        count: users.len(),
        data: users,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Not the same user and not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id("User", &id)?;
    if !auth_user.is_self_or_admin(id) {
        return Err(AppError::forbidden("Not authorized to access this user"));
    }

    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(UserResponse {
        success: true,
        data: user,
    }))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Validation error, duplicate e-mail or last admin", body = ErrorResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id("User", &id)?;
    if !auth_user.is_self_or_admin(id) {
        return Err(AppError::forbidden("Not authorized to update this user"));
    }
    if dto.role.is_some() && !auth_user.is_admin() {
        return Err(AppError::forbidden("Only admins can change roles"));
    }

    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(UserResponse {
        success: true,
        data: user,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = DeletedResponse),
        (status = 400, description = "Cannot delete the only admin", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_id("User", &id)?;
    UserService::delete_user(&state.db, id).await?;
    Ok(Json(DeletedResponse::new()))
}

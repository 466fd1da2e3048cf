//! Role-based authorization.
//!
//! Use [`RequireAdmin`] or [`RequireTeacher`] as handler arguments; both wrap
//! the authenticated [`AuthUser`]. For checks that depend on the record being
//! touched, use [`check_any_role`] in the handler.

use axum::{extract::FromRequestParts, http::request::Parts};
use rollbook_core::AppError;
use rollbook_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Roles allowed through [`RequireTeacher`].
pub const TEACHING_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Teacher];

/// Fails with `Forbidden` unless the caller holds one of `allowed_roles`.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let role = auth_user.role()?;

    if !allowed_roles.contains(&role) {
        return Err(AppError::forbidden(format!(
            "User role {} is not authorized to access this route",
            role
        )));
    }

    Ok(())
}

/// Extractor for admin-only routes.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, &[UserRole::Admin])?;
        Ok(RequireAdmin(auth_user))
    }
}

/// Extractor for admin or teacher routes.
#[derive(Debug, Clone)]
pub struct RequireTeacher(pub AuthUser);

impl FromRequestParts<AppState> for RequireTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, TEACHING_ROLES)?;
        Ok(RequireTeacher(auth_user))
    }
}

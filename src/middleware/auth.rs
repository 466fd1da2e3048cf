use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use rollbook_auth::{Claims, verify_token};
use rollbook_core::AppError;
use rollbook_models::UserRole;
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer JWT and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid role in token"))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Ok(UserRole::Admin))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// Whether the caller is `user_id` or an admin.
    pub fn is_self_or_admin(&self, user_id: Uuid) -> bool {
        self.is_admin() || self.user_id().is_ok_and(|id| id == user_id)
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Some)
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::unauthorized("Not authorized to access this route"))?;

        let claims = verify_token(token, &state.jwt_config)?;
        Ok(AuthUser(claims))
    }
}

/// Like [`AuthUser`] but never rejects: a missing or invalid token yields
/// `None`. Used by endpoints that are public but behave differently for
/// signed-in callers.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(e) => {
                debug!(reason = %e, "Proceeding without authentication");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}

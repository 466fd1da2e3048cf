//! Application error taxonomy and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`. Client-facing variants carry a
//! message that is safe to show; storage and internal failures are logged with
//! their full context chain and answered with a redacted `"Server Error"`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("{entity} not found with id of {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Cannot delete the only admin")]
    LastAdmin,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("storage failure")]
    Storage(#[source] anyhow::Error),

    #[error("internal failure")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Storage(err.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationFailed { .. }
            | Self::DuplicateEmail
            | Self::LastAdmin
            | Self::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Server-side failures never leak their cause.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Internal(_) => "Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let field = fields
            .first()
            .map(|(field, _)| field.to_string())
            .unwrap_or_else(|| "body".to_string());

        let reason = fields
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self::ValidationFailed { field, reason }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Storage(source) => error!(error = ?source, "Storage operation failed"),
            Self::Internal(source) => error!(error = ?source, "Unhandled internal failure"),
            _ => {}
        }

        let body = match &self {
            Self::ValidationFailed { field, reason } => json!({
                "success": false,
                "error": reason,
                "field": field,
            }),
            other => json!({
                "success": false,
                "error": other.public_message(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use rollbook_core::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Field path axum reports for a data error, e.g. `gender` in
/// "...target type: gender: unknown variant `male`...".
fn field_path(text: &str) -> Option<&str> {
    text.split("target type: ")
        .nth(1)
        .and_then(|rest| rest.split(": ").next())
        .filter(|path| !path.is_empty() && !path.contains(' '))
}

fn missing_field(text: &str) -> Option<&str> {
    text.split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::validation("body", "Missing 'Content-Type: application/json' header");
    }

    let text = rejection.body_text();

    if let Some(field) = missing_field(&text) {
        return AppError::validation(field, format!("{} is required", field));
    }

    if let Some(field) = field_path(&text) {
        return AppError::validation(field, format!("Invalid value for {}", field));
    }

    AppError::validation("body", "Invalid request body")
}

/// JSON body extractor that runs `validator` checks. Every failure becomes
/// `ValidationFailed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

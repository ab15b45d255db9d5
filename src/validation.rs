use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{AppError, FieldErrors};

pub const REQUIRED_FIELD_MESSAGE: &str = "Ce champ est obligatoire.";
const INVALID_VALUE_MESSAGE: &str = "Valeur invalide.";

/// JSON body that has passed its `validator` rules. Field problems come back
/// as a field → messages map, nested fields keyed with dots.
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

        value
            .validate()
            .map_err(|errors| AppError::validation(flatten_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Missing 'Content-Type: application/json' header")
        }
        JsonRejection::JsonSyntaxError(_) => AppError::bad_request("JSON parse error"),
        JsonRejection::JsonDataError(err) => {
            let body = err.body_text();
            match data_error_path(&body) {
                Some(path) => AppError::field(path, INVALID_VALUE_MESSAGE),
                None => AppError::bad_request(body),
            }
        }
        other => AppError::bad_request(other.body_text()),
    }
}

// Data errors read "<prefix>: <path>: <serde message>"; the path is only
// present when the error sits below the document root.
fn data_error_path(body: &str) -> Option<String> {
    let (_, detail) = body.split_once(": ")?;
    let (path, _) = detail.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) || path.contains('?') {
        return None;
    }
    Some(path.replace('[', ".").replace(']', ""))
}

pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut flat = FieldErrors::new();
    collect(errors, "", &mut flat);
    flat
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = out.entry(path).or_default();
                messages.extend(field_errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| INVALID_VALUE_MESSAGE.to_string())
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}.{index}"), out);
                }
            }
        }
    }
}

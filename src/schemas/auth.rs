use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{TeacherProfileChanges, UserResponse, validate_username};
use crate::auth::TokenBundle;

/// Every top-level field is required. They are optional here so that all
/// missing ones are reported together by `validate`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(max = 150, message = "Assurez-vous que ce champ comporte au plus 150 caractères."),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        email(message = "Saisissez une adresse e-mail valide.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(max = 150, message = "Assurez-vous que ce champ comporte au plus 150 caractères.")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(max = 150, message = "Assurez-vous que ce champ comporte au plus 150 caractères.")
    )]
    pub last_name: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 1, message = "Ce champ ne peut être vide.")
    )]
    pub password: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 1, message = "Ce champ ne peut être vide.")
    )]
    pub password_confirm: Option<String>,
    #[validate(required(message = "Ce champ est obligatoire."), nested)]
    pub teacher_profile: Option<TeacherProfileChanges>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 1, message = "Ce champ ne peut être vide.")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 1, message = "Ce champ ne peut être vide.")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(
        required(message = "Ce champ est obligatoire."),
        length(min = 1, message = "Ce champ ne peut être vide.")
    )]
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl From<TokenBundle> for TokenPair {
    fn from(bundle: TokenBundle) -> Self {
        Self {
            access: bundle.access_token,
            refresh: bundle.refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
    pub tokens: TokenPair,
}

mod auth;
mod profile;

pub use auth::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse,
    TokenPair,
};
pub use profile::{
    AccountChanges, ProfileUpdatedResponse, TeacherProfileChanges, TeacherProfileResponse,
    UserResponse,
};

use std::borrow::Cow;

use validator::ValidationError;

/// Letters, digits and `@ . + - _`, like most account systems accept.
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(error("blank", "Ce champ ne peut être vide."));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(error(
            "invalid_username",
            "Saisissez un nom d'utilisateur valide. Il ne peut contenir que des lettres, \
             des nombres ou les caractères « @ », « . », « + », « - » et « _ ».",
        ));
    }
    Ok(())
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

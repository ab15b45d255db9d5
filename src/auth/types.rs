use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub const INVALID_TOKEN_MESSAGE: &str = "Le jeton est invalide ou expiré.";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::unauthorized(INVALID_TOKEN_MESSAGE))
    }
}

#[derive(Debug, Clone)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
}

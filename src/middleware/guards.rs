use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header};

use crate::{auth::Claims, error::AppError, state::AppState};

pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "Informations d'authentification non fournies.";

// Auth guard: validate the bearer token with the active provider.
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(claims);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = auth
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized(MISSING_CREDENTIALS_MESSAGE))?;

        let claims = state.auth().verify(token).await?;

        parts.extensions.insert(claims.clone());
        Ok(claims)
    }
}

pub type AuthGuard = Claims;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    auth::{
        Claims, TokenBundle,
        jwt::{JwtKeys, decode_token, encode_token, make_access_claims},
        password::{hash_password, verify_password},
        types::INVALID_TOKEN_MESSAGE,
    },
    config::AuthConfig,
    db::{dao::RefreshTokenDao, entities::user},
    error::AppError,
    schemas::TeacherProfileChanges,
    services::user_service::{NewAccount, UserService},
};

use super::{AuthProvider, AuthProviderId};

pub const NO_ACTIVE_ACCOUNT_MESSAGE: &str =
    "Aucun compte actif n'a été trouvé avec les identifiants fournis";

#[derive(Debug, Clone, Copy)]
pub struct TokenTtl {
    pub access_secs: u64,
    pub refresh_days: i64,
}

impl TokenTtl {
    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self {
            access_secs: cfg.access_ttl_secs,
            refresh_days: cfg.refresh_ttl_days,
        }
    }
}

/// Accounts stored in our own database; access tokens are HS256 JWTs and
/// refresh tokens are opaque rows in `refresh_tokens`.
#[derive(Clone)]
pub struct LocalAuthProvider {
    user_service: UserService,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
    ttl: TokenTtl,
}

impl LocalAuthProvider {
    pub fn new(
        user_service: UserService,
        refresh_token_dao: RefreshTokenDao,
        jwt: JwtKeys,
        ttl: TokenTtl,
    ) -> Self {
        Self {
            user_service,
            refresh_token_dao,
            jwt,
            ttl,
        }
    }

    fn access_token_for(&self, user: &user::Model) -> Result<String, AppError> {
        let claims = make_access_claims(&user.id, self.ttl.access_secs);
        encode_token(&self.jwt, &claims)
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn issue_tokens(&self, user: &user::Model) -> Result<TokenBundle, AppError> {
        let access_token = self.access_token_for(user)?;
        let refresh = self
            .refresh_token_dao
            .create_refresh_token(user.id, self.ttl.refresh_days)
            .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token: refresh.token,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AppError> {
        let user = self
            .user_service
            .find_by_username(username)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::unauthorized(NO_ACTIVE_ACCOUNT_MESSAGE))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::unauthorized(NO_ACTIVE_ACCOUNT_MESSAGE));
        }

        let account = self.user_service.record_login(user).await?;
        self.issue_tokens(&account.user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let token = self
            .refresh_token_dao
            .find_active_by_token(refresh_token)
            .await?
            .filter(|token| token.is_usable_at(Utc::now().fixed_offset()))
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN_MESSAGE))?;

        let user = self
            .user_service
            .find_by_id(&token.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN_MESSAGE))?;

        self.access_token_for(&user)
    }

    async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        let claims = decode_token(&self.jwt, access_token)?;
        // The owner must still exist and be active, as for login and refresh.
        self.user_service
            .find_by_id(&claims.user_id()?)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN_MESSAGE))?;
        Ok(claims)
    }

    async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        let Some(admin) = cfg.admin.as_ref() else {
            return Ok(());
        };

        if let Some(existing) = self
            .user_service
            .find_by_username(&admin.username)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?
        {
            tracing::info!("admin user already present: {}", existing.username);
            return Ok(());
        }

        let password_hash = hash_password(&admin.password)
            .map_err(|e| anyhow::anyhow!("admin seed hash error: {e}"))?;
        let account = self
            .user_service
            .create_account(
                NewAccount {
                    username: admin.username.clone(),
                    email: admin.email.clone(),
                    first_name: String::new(),
                    last_name: String::new(),
                    password_hash,
                    is_staff: true,
                    is_superuser: true,
                },
                TeacherProfileChanges::default(),
            )
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        tracing::info!("seeded admin user {}", account.user.username);
        Ok(())
    }
}

use std::sync::Arc;

use axum::{Router, middleware};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    auth::{
        bootstrap::build_providers,
        jwt::{JwtKeys, encode_token, make_access_claims},
    },
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::connection,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::ServiceContext,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    let cfg = AppConfig {
        auth: Some(AuthConfig::with_secret(TEST_JWT_SECRET)),
        ..Default::default()
    };
    let services = ServiceContext::new(&db);
    let providers = build_providers(
        cfg.auth.as_ref().expect("auth config should be present"),
        &services,
    )
    .expect("create auth providers");
    AppState::new(cfg, db, providers)
}

/// Full router with the same error layers as the binary.
pub fn test_router(db: DatabaseConnection) -> Router {
    router(test_state(db))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}

/// In-memory sqlite with the schema synced. One pooled connection keeps the
/// database alive for the whole test.
pub async fn sqlite_memory_db() -> DatabaseConnection {
    connection::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    })
    .await
    .expect("in-memory sqlite should connect")
}

pub fn bearer_for(user_id: Uuid) -> String {
    let keys = JwtKeys::from_secret(TEST_JWT_SECRET.as_bytes());
    let token = encode_token(&keys, &make_access_claims(&user_id, 300))
        .expect("token should encode");
    format!("Bearer {token}")
}

/// Rows shaped like the database returns them, for `MockDatabase` results.
pub mod fixtures {
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use sea_orm::entity::prelude::Json;
    use uuid::Uuid;

    use crate::db::entities::{refresh_token, teacher_profile, user};

    pub fn ts() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    pub fn user_model(id: Uuid, username: &str, email: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "hash".to_string(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login_at: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    pub fn profile_model(user_id: Uuid) -> teacher_profile::Model {
        teacher_profile::Model {
            id: Uuid::new_v4(),
            user_id,
            commission_scolaire: String::new(),
            school_name: String::new(),
            grade_levels: Json::Array(Vec::new()),
            subjects: Json::Array(Vec::new()),
            phone_number: String::new(),
            is_verified: false,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    /// Token expiring `ttl` from now; a negative `ttl` gives an expired token.
    pub fn refresh_token_model(
        token: &str,
        user_id: Uuid,
        ttl: chrono::Duration,
    ) -> refresh_token::Model {
        refresh_token::Model {
            id: Uuid::new_v4(),
            token: token.to_string(),
            user_id,
            expires_at: Utc::now().fixed_offset() + ttl,
            revoked: false,
            created_at: ts(),
            updated_at: ts(),
        }
    }
}

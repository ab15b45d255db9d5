use std::sync::Arc;

use axum::{Router, extract::State, routing::post};

use crate::{
    response::{ApiResult, JsonApiResponse},
    schemas::{
        AccessTokenResponse, LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse,
        TokenPair, UserResponse,
    },
    state::AppState,
    validation::ValidatedJson,
};

pub const REGISTERED_MESSAGE: &str = "Inscription réussie";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register/", post(register))
        .route("/auth/login/", post(login))
        .route("/auth/token/refresh/", post(refresh))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    let account = state.services().user().register(body).await?;
    let tokens = state.auth().issue_tokens(&account.user).await?;

    JsonApiResponse::created(RegisterResponse {
        message: REGISTERED_MESSAGE,
        user: UserResponse::new(&account.user, &account.profile),
        tokens: tokens.into(),
    })
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenPair> {
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();
    let tokens = state.auth().login(&username, &password).await?;
    JsonApiResponse::ok(tokens.into())
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> ApiResult<AccessTokenResponse> {
    let access = state
        .auth()
        .refresh(body.refresh.as_deref().unwrap_or_default())
        .await?;
    JsonApiResponse::ok(AccessTokenResponse { access })
}

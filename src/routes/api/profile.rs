use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    schemas::{AccountChanges, ProfileUpdatedResponse, TeacherProfileChanges, UserResponse},
    state::AppState,
    validation::ValidatedJson,
};

pub const PROFILE_UPDATED_MESSAGE: &str = "Profil mis à jour avec succès";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/auth/profile/",
            get(get_profile).put(replace_profile).patch(patch_profile),
        )
        .route(
            "/auth/profile/teacher/",
            put(update_teacher_profile).patch(update_teacher_profile),
        )
        .with_state(state)
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<UserResponse> {
    let account = state.services().user().account(claims.user_id()?).await?;
    JsonApiResponse::ok(UserResponse::new(&account.user, &account.profile))
}

async fn replace_profile(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    ValidatedJson(body): ValidatedJson<AccountChanges>,
) -> ApiResult<UserResponse> {
    update_profile(&state, &claims, body, false).await
}

async fn patch_profile(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    ValidatedJson(body): ValidatedJson<AccountChanges>,
) -> ApiResult<UserResponse> {
    update_profile(&state, &claims, body, true).await
}

async fn update_profile(
    state: &AppState,
    claims: &AuthGuard,
    changes: AccountChanges,
    partial: bool,
) -> ApiResult<UserResponse> {
    let account = state
        .services()
        .user()
        .update_account(claims.user_id()?, changes, partial)
        .await?;
    JsonApiResponse::ok(UserResponse::new(&account.user, &account.profile))
}

async fn update_teacher_profile(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    ValidatedJson(body): ValidatedJson<TeacherProfileChanges>,
) -> ApiResult<ProfileUpdatedResponse> {
    let account = state
        .services()
        .user()
        .update_teacher_profile(claims.user_id()?, body)
        .await?;

    JsonApiResponse::ok(ProfileUpdatedResponse {
        message: PROFILE_UPDATED_MESSAGE,
        user: UserResponse::new(&account.user, &account.profile),
    })
}

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{auth, health, profile};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state.clone()))
        .merge(profile::router(state))
}

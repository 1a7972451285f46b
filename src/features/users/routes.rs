use crate::features::users::handlers::profile_handler;
use crate::features::users::services::UserService;
use axum::{routing::put, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/auth/profile", put(profile_handler::update_profile))
        .with_state(service)
}

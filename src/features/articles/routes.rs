use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::features::articles::handlers;
use crate::features::articles::services::ArticleService;
use crate::shared::constants::MULTIPART_BODY_LIMIT;

/// Public article routes (no authentication required)
pub fn public_routes(service: Arc<ArticleService>) -> Router {
    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/{id}", get(handlers::get_article))
        .with_state(service)
}

/// Protected article routes (require bearer authentication)
pub fn protected_routes(service: Arc<ArticleService>) -> Router {
    Router::new()
        .route(
            "/api/articles",
            post(handlers::create_article).layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        )
        .route("/api/articles/manage", get(handlers::list_managed_articles))
        .route(
            "/api/articles/{id}",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        .route(
            "/api/articles/{id}/status",
            put(handlers::update_article_status),
        )
        .with_state(service)
}

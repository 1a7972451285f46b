//! Service wiring and the HTTP router shared by `main` and the test harness

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn_with_state, routing::get,
    Router,
};
use tower_http::services::ServeDir;

use crate::core::config::AuthConfig;
use crate::core::middleware;
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::articles::repositories::ArticleRepository;
use crate::features::articles::{routes as articles_routes, ArticleService};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, TokenService};
use crate::features::files::FileService;
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::users::repositories::UserRepository;
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::storage::FileStorage;
use crate::shared::constants::UPLOADS_PATH;

/// Persistence backends the services are built on
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub articles: Arc<dyn ArticleRepository>,
}

/// Every service the router hands out as handler state
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub reports: Arc<ReportService>,
    pub articles: Arc<ArticleService>,
    pub admin: Arc<AdminService>,
}

impl AppServices {
    pub fn new(
        repositories: Repositories,
        storage: Arc<dyn FileStorage>,
        auth_config: &AuthConfig,
        public_base_url: &str,
    ) -> Self {
        let users = Arc::new(UserService::new(repositories.users));
        let tokens = Arc::new(TokenService::new(auth_config));
        let auth = Arc::new(AuthService::new(Arc::clone(&users), tokens));

        let files = Arc::new(FileService::new(storage, public_base_url));
        let reports = Arc::new(ReportService::new(
            repositories.reports,
            Arc::clone(&files),
        ));
        let articles = Arc::new(ArticleService::new(
            repositories.articles,
            Arc::clone(&files),
        ));
        let admin = Arc::new(AdminService::new(
            Arc::clone(&users),
            Arc::clone(&reports),
            Arc::clone(&articles),
        ));

        Self {
            auth,
            users,
            reports,
            articles,
            admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Directory served read-only under `/uploads`
    pub upload_dir: PathBuf,
    /// Body limit for non-multipart routes
    pub max_body_size: usize,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Build the API router without the outer tracing/CORS/request-id layers
pub fn build_router(services: &AppServices, options: RouterOptions) -> Router {
    // Protected routes (require bearer authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(users_routes::routes(Arc::clone(&services.users)))
        .merge(reports_routes::routes(Arc::clone(&services.reports)))
        .merge(articles_routes::protected_routes(Arc::clone(
            &services.articles,
        )))
        .nest(
            "/api/admin",
            admin_routes::routes(Arc::clone(&services.admin)),
        )
        .route_layer(from_fn_with_state(
            Arc::clone(&services.auth),
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .merge(articles_routes::public_routes(Arc::clone(
            &services.articles,
        )))
        .route("/health", get(health_check));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .nest_service(UPLOADS_PATH, ServeDir::new(options.upload_dir))
        .layer(DefaultBodyLimit::max(options.max_body_size))
}

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;
use crate::shared::constants::MULTIPART_BODY_LIMIT;

/// Create routes for the reports feature
///
/// All routes require the auth middleware, applied by the caller
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports)
                .post(handlers::create_report)
                .layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        )
        .route("/api/reports/my-reports", get(handlers::list_my_reports))
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).put(handlers::update_report),
        )
        .route(
            "/api/reports/{id}/status",
            put(handlers::update_report_status),
        )
        .route(
            "/api/reports/{id}/actions",
            post(handlers::add_report_action),
        )
        .with_state(service)
}

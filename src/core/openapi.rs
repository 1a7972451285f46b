use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::articles::{
    dtos as articles_dtos, handlers as articles_handlers, models as articles_models,
};
use crate::features::auth;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Users
        profile_handler::update_profile,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::list_my_reports,
        reports_handlers::get_report,
        reports_handlers::update_report,
        reports_handlers::update_report_status,
        reports_handlers::add_report_action,
        // Articles
        articles_handlers::list_articles,
        articles_handlers::get_article,
        articles_handlers::list_managed_articles,
        articles_handlers::create_article,
        articles_handlers::update_article,
        articles_handlers::update_article_status,
        articles_handlers::delete_article,
        // Admin
        admin_handlers::list_users,
        admin_handlers::get_user,
        admin_handlers::create_user,
        admin_handlers::update_user,
        admin_handlers::delete_user,
        admin_handlers::get_stats,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::UserResponseDto,
            users_dtos::UpdateProfileDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportCategory,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportActionResponseDto,
            reports_dtos::ReportDetailResponseDto,
            reports_dtos::CreateReportForm,
            reports_dtos::UpdateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::AddReportActionDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            // Articles
            articles_models::ArticleStatus,
            articles_dtos::ArticleResponseDto,
            articles_dtos::CreateArticleForm,
            articles_dtos::UpdateArticleDto,
            articles_dtos::UpdateArticleStatusDto,
            ApiResponse<articles_dtos::ArticleResponseDto>,
            ApiResponse<Vec<articles_dtos::ArticleResponseDto>>,
            // Admin
            admin_dtos::CreateUserDto,
            admin_dtos::UpdateUserDto,
            admin_dtos::UserStatsDto,
            admin_dtos::ReportStatsDto,
            admin_dtos::ArticleStatsDto,
            admin_dtos::StatsResponseDto,
            ApiResponse<admin_dtos::StatsResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and current user"),
        (name = "users", description = "User profile management"),
        (name = "reports", description = "Citizen reports, status changes and action log"),
        (name = "articles", description = "Village news articles and moderation"),
        (name = "admin", description = "User management and statistics (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "LaporWarga API",
        version = "0.1.0",
        description = "API documentation for LaporWarga",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/auth/register",
            "/api/auth/me",
            "/api/reports",
            "/api/reports/{id}/status",
            "/api/articles/manage",
            "/api/admin/stats",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
        assert!(doc
            .components
            .unwrap()
            .security_schemes
            .contains_key("bearer_auth"));
    }
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::articles::dtos::{
    ArticleListQuery, ArticleResponseDto, CreateArticleDto, CreateArticleForm, UpdateArticleDto,
    UpdateArticleStatusDto,
};
use crate::features::articles::services::ArticleService;
use crate::features::auth::guards::{RequireAdmin, RequireStaff};
use crate::features::files::MultipartForm;
use crate::shared::types::ApiResponse;

/// List approved articles (public)
#[utoipa::path(
    get,
    path = "/api/articles",
    responses(
        (status = 200, description = "Approved articles, newest first", body = ApiResponse<Vec<ArticleResponseDto>>)
    ),
    tag = "articles"
)]
pub async fn list_articles(
    State(service): State<Arc<ArticleService>>,
) -> Result<Json<ApiResponse<Vec<ArticleResponseDto>>>> {
    let articles = service.list_published().await?;
    let dtos: Vec<ArticleResponseDto> = articles.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// Get an approved article (public)
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article found", body = ApiResponse<ArticleResponseDto>),
        (status = 404, description = "Article not found or not approved")
    ),
    tag = "articles"
)]
pub async fn get_article(
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ArticleResponseDto>>> {
    let article = service.get_published(id).await?;
    Ok(Json(ApiResponse::success(Some(article.into()), None, None)))
}

/// List articles in any state (staff/admin)
#[utoipa::path(
    get,
    path = "/api/articles/manage",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Articles, newest first", body = ApiResponse<Vec<ArticleResponseDto>>),
        (status = 400, description = "Invalid status filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Village staff or admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn list_managed_articles(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<ArticleService>>,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleResponseDto>>>> {
    let articles = service
        .list_for_management(&user, query.status.as_deref())
        .await?;
    let dtos: Vec<ArticleResponseDto> = articles.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// Write a new article; it waits for admin approval
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body(
        content = CreateArticleForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Article created as pending", body = ApiResponse<ArticleResponseDto>),
        (status = 400, description = "Validation error or unsupported image"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Village staff or admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn create_article(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<ArticleService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ArticleResponseDto>>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let mut images = form.take_files("image");
    if images.len() > 1 {
        return Err(AppError::Validation(
            "Only one article image may be uploaded".to_string(),
        ));
    }
    let dto = CreateArticleDto {
        title: form.text_or_empty("title"),
        content: form.text_or_empty("content"),
        author: form.text("author").map(str::to_string),
    };

    let article = service.create_article(&user, dto, images.pop()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(article.into()), None, None)),
    ))
}

/// Edit an article (admin)
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    request_body = UpdateArticleDto,
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<ArticleResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Article not found")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn update_article(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateArticleDto>,
) -> Result<Json<ApiResponse<ArticleResponseDto>>> {
    let article = service.update_article(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(article.into()), None, None)))
}

/// Approve or reject an article (admin)
#[utoipa::path(
    put,
    path = "/api/articles/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    request_body = UpdateArticleStatusDto,
    responses(
        (status = 200, description = "Article status updated", body = ApiResponse<ArticleResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Article not found")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn update_article_status(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateArticleStatusDto>,
) -> Result<Json<ApiResponse<ArticleResponseDto>>> {
    let article = service.update_status(&user, id, &dto.status).await?;
    Ok(Json(ApiResponse::success(Some(article.into()), None, None)))
}

/// Delete an article (admin)
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Article not found")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn delete_article(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_article(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Article deleted".to_string()),
        None,
    )))
}

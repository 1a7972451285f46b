use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::articles::models::{Article, ArticleStatus};
use crate::shared::validation::not_blank;

/// Response DTO for article
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponseDto {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub image: Option<String>,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponseDto {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
            author: a.author,
            image: a.image,
            status: a.status,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Text fields of the article creation form
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateArticleDto {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    /// Defaults to the author's full name when absent or blank
    #[validate(length(max = 128))]
    pub author: Option<String>,
}

/// Article creation form for OpenAPI documentation
/// Note: the handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateArticleForm {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    /// Optional cover image (jpeg, jpg, png, gif), at most 5MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Request DTO for editing an article
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateArticleDto {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 128))]
    pub author: Option<String>,
}

/// Request DTO for moderating an article
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateArticleStatusDto {
    #[serde(default)]
    #[schema(example = "approved")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ArticleListQuery {
    /// Filter by status: pending, approved or rejected
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_article_requires_title_and_content() {
        let dto = CreateArticleDto {
            title: "".to_string(),
            content: "Kerja bakti hari Minggu".to_string(),
            author: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateArticleDto {
            title: "Kerja Bakti".to_string(),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_article_rejects_blank_author() {
        let dto = UpdateArticleDto {
            author: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::articles::dtos::{CreateArticleDto, UpdateArticleDto};
use crate::features::articles::models::{Article, ArticleStatus, CreateArticle, UpdateArticle};
use crate::features::articles::repositories::ArticleRepository;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::{FileService, UploadedFile};

/// Staff write articles, admins moderate them, the public reads approved ones
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    files: Arc<FileService>,
}

fn parse_status(value: &str) -> Result<ArticleStatus> {
    value.parse().map_err(AppError::Validation)
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Article {} not found", id))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepository>, files: Arc<FileService>) -> Self {
        Self { articles, files }
    }

    fn require_admin(actor: &AuthenticatedUser) -> Result<()> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }

    fn require_staff(actor: &AuthenticatedUser) -> Result<()> {
        if !actor.has_staff_access() {
            return Err(AppError::Forbidden(
                "Village staff or admin access required".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn list_published(&self) -> Result<Vec<Article>> {
        self.articles.list(Some(ArticleStatus::Approved)).await
    }

    /// Unapproved articles are reported as missing
    pub async fn get_published(&self, id: Uuid) -> Result<Article> {
        match self.articles.find_by_id(id).await? {
            Some(article) if article.status == ArticleStatus::Approved => Ok(article),
            _ => Err(not_found(id)),
        }
    }

    pub async fn list_for_management(
        &self,
        actor: &AuthenticatedUser,
        status: Option<&str>,
    ) -> Result<Vec<Article>> {
        Self::require_staff(actor)?;
        let status = status
            .filter(|s| !s.trim().is_empty())
            .map(parse_status)
            .transpose()?;
        self.articles.list(status).await
    }

    /// Create a `pending` article. The author defaults to the actor's name.
    pub async fn create_article(
        &self,
        actor: &AuthenticatedUser,
        input: CreateArticleDto,
        image: Option<UploadedFile>,
    ) -> Result<Article> {
        Self::require_staff(actor)?;
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let images: Vec<UploadedFile> = image.into_iter().collect();
        let image = self.files.store_images(&images, 1).await?.into_iter().next();

        let author = input
            .author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| actor.full_name.clone());

        let data = CreateArticle {
            id: Uuid::now_v7(),
            title: input.title.trim().to_string(),
            content: input.content.trim().to_string(),
            author,
            image,
        };

        let article = match self.articles.create(&data).await {
            Ok(article) => article,
            Err(e) => {
                if let Some(url) = data.image {
                    self.files.remove_images(&[url]).await;
                }
                return Err(e);
            }
        };

        tracing::info!("Created article: {} by {}", article.id, actor.id);
        Ok(article)
    }

    pub async fn update_article(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        input: UpdateArticleDto,
    ) -> Result<Article> {
        Self::require_admin(actor)?;
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let data = UpdateArticle {
            title: trimmed(input.title),
            content: trimmed(input.content),
            author: trimmed(input.author),
        };

        let article = self
            .articles
            .update(id, &data)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!("Article {} edited by {}", id, actor.id);
        Ok(article)
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: &str,
    ) -> Result<Article> {
        Self::require_admin(actor)?;
        let status = parse_status(status)?;

        let article = self
            .articles
            .update_status(id, status)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!("Article {} moderated to {} by {}", id, status, actor.id);
        Ok(article)
    }

    /// Hard delete; the cover image is removed on a best-effort basis
    pub async fn delete_article(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        Self::require_admin(actor)?;

        let article = self.articles.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        if !self.articles.delete(id).await? {
            return Err(not_found(id));
        }
        if let Some(url) = article.image {
            self.files.remove_images(&[url]).await;
        }

        tracing::info!("Article {} deleted by {}", id, actor.id);
        Ok(())
    }

    pub async fn count_by_status(&self) -> Result<Vec<(ArticleStatus, i64)>> {
        self.articles.count_by_status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::TestContext;

    fn draft() -> CreateArticleDto {
        CreateArticleDto {
            title: "Kerja Bakti Minggu Ini".to_string(),
            content: "Warga RT 001 diundang membersihkan saluran air.".to_string(),
            author: None,
        }
    }

    fn cover() -> UploadedFile {
        UploadedFile::new("cover.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47])
    }

    #[tokio::test]
    async fn test_staff_article_waits_for_approval() {
        let ctx = TestContext::new().await;
        let staff = ctx.create_user("Pak RT", UserRole::VillageStaff).await;
        let admin = ctx.create_user("Admin Desa", UserRole::Admin).await;
        let service = &ctx.services.articles;

        let article = service
            .create_article(&staff, draft(), Some(cover()))
            .await
            .unwrap();
        assert_eq!(article.status, ArticleStatus::Pending);
        assert_eq!(article.author, "Pak RT");
        assert!(article.image.as_deref().unwrap().ends_with(".png"));

        assert!(service.list_published().await.unwrap().is_empty());
        assert!(matches!(
            service.get_published(article.id).await,
            Err(AppError::NotFound(_))
        ));

        service
            .update_status(&admin, article.id, "approved")
            .await
            .unwrap();
        assert_eq!(service.list_published().await.unwrap().len(), 1);
        assert_eq!(
            service.get_published(article.id).await.unwrap().title,
            "Kerja Bakti Minggu Ini"
        );
    }

    #[tokio::test]
    async fn test_citizens_cannot_write_or_manage() {
        let ctx = TestContext::new().await;
        let citizen = ctx.create_user("Siti", UserRole::Citizen).await;
        let service = &ctx.services.articles;

        assert!(matches!(
            service.create_article(&citizen, draft(), None).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.list_for_management(&citizen, None).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_only_admins_moderate_edit_and_delete() {
        let ctx = TestContext::new().await;
        let staff = ctx.create_user("Pak RT", UserRole::VillageStaff).await;
        let admin = ctx.create_user("Admin Desa", UserRole::Admin).await;
        let service = &ctx.services.articles;
        let article = service.create_article(&staff, draft(), None).await.unwrap();

        assert!(matches!(
            service.update_status(&staff, article.id, "approved").await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service
                .update_article(&staff, article.id, UpdateArticleDto::default())
                .await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete_article(&staff, article.id).await,
            Err(AppError::Forbidden(_))
        ));

        let edited = service
            .update_article(
                &admin,
                article.id,
                UpdateArticleDto {
                    title: Some("Kerja Bakti Ditunda".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.title, "Kerja Bakti Ditunda");
        assert_eq!(edited.content, article.content);
        assert_eq!(edited.status, ArticleStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_status_is_validation_error() {
        let ctx = TestContext::new().await;
        let admin = ctx.create_user("Admin Desa", UserRole::Admin).await;
        let service = &ctx.services.articles;
        let article = service.create_article(&admin, draft(), None).await.unwrap();

        assert!(matches!(
            service.update_status(&admin, article.id, "published").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.update_status(&admin, Uuid::now_v7(), "approved").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.list_for_management(&admin, Some("archived")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_management_listing_filters_by_status() {
        let ctx = TestContext::new().await;
        let admin = ctx.create_user("Admin Desa", UserRole::Admin).await;
        let service = &ctx.services.articles;
        let first = service.create_article(&admin, draft(), None).await.unwrap();
        service.create_article(&admin, draft(), None).await.unwrap();
        service
            .update_status(&admin, first.id, "rejected")
            .await
            .unwrap();

        assert_eq!(
            service.list_for_management(&admin, None).await.unwrap().len(),
            2
        );
        let rejected = service
            .list_for_management(&admin, Some("rejected"))
            .await
            .unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].id, first.id);
    }

    #[tokio::test]
    async fn test_delete_removes_cover_image() {
        let ctx = TestContext::new().await;
        let admin = ctx.create_user("Admin Desa", UserRole::Admin).await;
        let service = &ctx.services.articles;
        let article = service
            .create_article(&admin, draft(), Some(cover()))
            .await
            .unwrap();
        assert_eq!(ctx.uploaded_file_count(), 1);

        service.delete_article(&admin, article.id).await.unwrap();
        assert_eq!(ctx.uploaded_file_count(), 0);
        assert!(matches!(
            service.delete_article(&admin, article.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_explicit_author_is_kept() {
        let ctx = TestContext::new().await;
        let staff = ctx.create_user("Pak RT", UserRole::VillageStaff).await;
        let mut input = draft();
        input.author = Some("Karang Taruna".to_string());

        let article = ctx
            .services
            .articles
            .create_article(&staff, input, None)
            .await
            .unwrap();
        assert_eq!(article.author, "Karang Taruna");
    }
}

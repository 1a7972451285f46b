use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::articles::models::{Article, ArticleStatus, CreateArticle, UpdateArticle};

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, data: &CreateArticle) -> Result<Article>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>>;
    /// Newest first, optionally restricted to one status
    async fn list(&self, status: Option<ArticleStatus>) -> Result<Vec<Article>>;
    async fn update(&self, id: Uuid, data: &UpdateArticle) -> Result<Option<Article>>;
    async fn update_status(&self, id: Uuid, status: ArticleStatus) -> Result<Option<Article>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn count_by_status(&self) -> Result<Vec<(ArticleStatus, i64)>>;
}

const ARTICLE_COLUMNS: &str = "id, title, content, author, image, status, created_at, updated_at";

pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn create(&self, data: &CreateArticle) -> Result<Article> {
        let sql = format!(
            r#"
            INSERT INTO articles (id, title, content, author, image, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {ARTICLE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Article>(&sql)
            .bind(data.id)
            .bind(&data.title)
            .bind(&data.content)
            .bind(&data.author)
            .bind(&data.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create article: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");

        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get article: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, status: Option<ArticleStatus>) -> Result<Vec<Article>> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE ($1::article_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            "#
        );

        sqlx::query_as::<_, Article>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list articles: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update(&self, id: Uuid, data: &UpdateArticle) -> Result<Option<Article>> {
        let sql = format!(
            r#"
            UPDATE articles
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                author = COALESCE($4, author),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(&data.title)
            .bind(&data.content)
            .bind(&data.author)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update article: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_status(&self, id: Uuid, status: ArticleStatus) -> Result<Option<Article>> {
        let sql = format!(
            r#"
            UPDATE articles
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update article status: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete article: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self) -> Result<Vec<(ArticleStatus, i64)>> {
        sqlx::query_as::<_, (ArticleStatus, i64)>(
            "SELECT status, COUNT(*) FROM articles GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count articles: {:?}", e);
            AppError::Database(e)
        })
    }
}

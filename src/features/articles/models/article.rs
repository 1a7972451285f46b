use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Moderation state of an article, matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "article_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleStatus::Pending => write!(f, "pending"),
            ArticleStatus::Approved => write!(f, "approved"),
            ArticleStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(ArticleStatus::Pending),
            "approved" => Ok(ArticleStatus::Approved),
            "rejected" => Ok(ArticleStatus::Rejected),
            other => Err(format!(
                "Invalid article status '{}'. Allowed: pending, approved, rejected",
                other
            )),
        }
    }
}

/// Database model for article
#[derive(Debug, Clone, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub image: Option<String>,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting an article; new articles always start `pending`
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub image: Option<String>,
}

/// Admin edit of an article; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

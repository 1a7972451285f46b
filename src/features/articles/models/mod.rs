mod article;

pub use article::{Article, ArticleStatus, CreateArticle, UpdateArticle};

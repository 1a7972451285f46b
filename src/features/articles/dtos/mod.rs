mod article_dto;

pub use article_dto::{
    ArticleListQuery, ArticleResponseDto, CreateArticleDto, CreateArticleForm, UpdateArticleDto,
    UpdateArticleStatusDto,
};

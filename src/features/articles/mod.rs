//! Informational articles with a staff-write / admin-moderate workflow.
//!
//! Public readers only ever see `approved` articles.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::ArticleService;

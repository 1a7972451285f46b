//! Feature modules, each owning its models, repositories, services, handlers and routes

pub mod admin;
pub mod articles;
pub mod auth;
pub mod files;
pub mod reports;
pub mod users;

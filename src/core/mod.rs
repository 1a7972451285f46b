//! Core layer - configuration, errors, HTTP plumbing and application wiring

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod openapi;

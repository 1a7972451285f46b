//! Modules layer - Infrastructure adapters
//!
//! Contains the file storage backend used for uploaded images.

pub mod storage;

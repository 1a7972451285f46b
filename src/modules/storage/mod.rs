//! Storage module for uploaded files
//!
//! Provides the `FileStorage` port and the local-disk adapter whose
//! directory is served statically under `/uploads`.

mod local_disk;

pub use local_disk::LocalDiskStorage;

use async_trait::async_trait;

use crate::core::error::Result;

/// Blob storage for uploaded files, addressed by generated file name
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores the bytes under a fresh collision-free name and returns that name
    async fn save(&self, extension: &str, data: &[u8]) -> Result<String>;

    /// Removes a previously stored file. Missing files are not an error.
    async fn remove(&self, file_name: &str) -> Result<()>;
}

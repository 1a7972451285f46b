//! Local filesystem storage
//!
//! Files are written flat into the upload directory with names of the form
//! `<unix-millis>-<9 random digits>.<ext>`.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::modules::storage::FileStorage;

const MAX_NAME_ATTEMPTS: usize = 3;

/// Writes `data` through `writer`. On failure the partial file at `path` is
/// removed so no orphan is left behind.
async fn write_or_discard<W>(mut writer: W, path: &Path, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;

    let Err(e) = written else {
        return Ok(());
    };

    drop(writer);
    if let Err(remove_err) = tokio::fs::remove_file(path).await {
        warn!(
            "Failed to remove partial file '{}': {}",
            path.display(),
            remove_err
        );
    }

    Err(AppError::Internal(format!(
        "Failed to write file '{}': {}",
        path.display(),
        e
    )))
}

pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    /// Create the storage, making sure the directory exists
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory '{}': {}",
                root.display(),
                e
            ))
        })?;

        info!("Local upload storage ready at {}", root.display());

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generate_name(extension: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
        format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let plain = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && file_name != "."
            && file_name != "..";
        if !plain {
            return Err(AppError::BadRequest(format!(
                "Invalid stored file name '{}'",
                file_name
            )));
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl FileStorage for LocalDiskStorage {
    async fn save(&self, extension: &str, data: &[u8]) -> Result<String> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = Self::generate_name(extension);
            let path = self.resolve(&name)?;

            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::Internal(format!(
                        "Failed to create file '{}': {}",
                        path.display(),
                        e
                    )))
                }
            };

            write_or_discard(file, &path, data).await?;

            debug!("Stored upload {} ({} bytes)", name, data.len());
            return Ok(name);
        }

        Err(AppError::Internal(
            "Could not allocate a unique file name".to_string(),
        ))
    }

    async fn remove(&self, file_name: &str) -> Result<()> {
        let path = self.resolve(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed upload {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to remove file '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use uuid::Uuid;

    /// Writer whose every write fails, like a full disk
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    async fn temp_storage() -> LocalDiskStorage {
        let dir = std::env::temp_dir().join(format!("laporwarga-storage-{}", Uuid::new_v4()));
        LocalDiskStorage::new(dir).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_writes_bytes_under_generated_name() {
        let storage = temp_storage().await;

        let name = storage.save("png", b"png-bytes").await.unwrap();

        let (millis, rest) = name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        let (digits, ext) = rest.split_once('.').unwrap();
        assert_eq!(digits.len(), 9);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(ext, "png");

        let stored = tokio::fs::read(storage.root().join(&name)).await.unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn test_names_do_not_collide() {
        let storage = temp_storage().await;

        let a = storage.save("jpg", b"a").await.unwrap();
        let b = storage.save("jpg", b"b").await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let storage = temp_storage().await;
        let name = storage.save("gif", b"gif").await.unwrap();

        storage.remove(&name).await.unwrap();
        storage.remove(&name).await.unwrap();

        assert!(!storage.root().join(&name).exists());
    }

    #[tokio::test]
    async fn test_remove_rejects_paths() {
        let storage = temp_storage().await;

        assert!(matches!(
            storage.remove("../secret.txt").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let storage = temp_storage().await;
        let path = storage.root().join("1700000000000-123456789.jpg");
        tokio::fs::write(&path, b"partial").await.unwrap();

        let result = write_or_discard(FullDisk, &path, b"full image bytes").await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(!path.exists());
    }
}

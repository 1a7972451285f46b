use std::sync::Arc;
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::models::UploadedFile;
use crate::modules::storage::FileStorage;
use crate::shared::constants::{
    ALLOWED_IMAGE_EXTENSIONS, ALLOWED_IMAGE_MIME_TYPES, MAX_IMAGE_SIZE, UPLOADS_PATH,
};

/// Validates image uploads and turns them into public URLs
pub struct FileService {
    storage: Arc<dyn FileStorage>,
    public_base_url: String,
}

impl FileService {
    pub fn new(storage: Arc<dyn FileStorage>, public_base_url: impl Into<String>) -> Self {
        Self {
            storage,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Checks count, type and size of every file. Nothing is written.
    ///
    /// Wrong content type or extension is `UnsupportedMedia`; too many files
    /// or an oversized file is `Validation`.
    pub fn validate_images(files: &[UploadedFile], max_files: usize) -> Result<()> {
        if files.len() > max_files {
            return Err(AppError::Validation(format!(
                "At most {} images may be uploaded, got {}",
                max_files,
                files.len()
            )));
        }

        for file in files {
            let content_type = file.content_type.to_ascii_lowercase();
            let type_allowed = ALLOWED_IMAGE_MIME_TYPES.contains(&content_type.as_str());
            let extension_allowed = file
                .extension()
                .is_some_and(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()));

            if !type_allowed || !extension_allowed {
                return Err(AppError::UnsupportedMedia(format!(
                    "File '{}' is not an allowed image. Allowed types: {}",
                    file.file_name,
                    ALLOWED_IMAGE_EXTENSIONS.join(", ")
                )));
            }

            if file.size() > MAX_IMAGE_SIZE {
                return Err(AppError::Validation(format!(
                    "File '{}' is too large. Maximum size is {} MB",
                    file.file_name,
                    MAX_IMAGE_SIZE / 1024 / 1024
                )));
            }
        }

        Ok(())
    }

    /// Validates then stores all files, returning their URLs in input order.
    /// If any write fails the files already written are removed.
    pub async fn store_images(&self, files: &[UploadedFile], max_files: usize) -> Result<Vec<String>> {
        Self::validate_images(files, max_files)?;

        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            // validated above, so an extension is present
            let extension = file.extension().unwrap_or_default();
            match self.storage.save(&extension, &file.data).await {
                Ok(name) => urls.push(self.url_for(&name)),
                Err(e) => {
                    self.remove_images(&urls).await;
                    return Err(e);
                }
            }
        }

        if !urls.is_empty() {
            info!("Stored {} uploaded image(s)", urls.len());
        }

        Ok(urls)
    }

    /// Best-effort removal of stored images by URL; failures are only logged
    pub async fn remove_images(&self, urls: &[String]) {
        for url in urls {
            let Some(name) = self.file_name_of(url) else {
                warn!("Not removing '{}': not an upload URL", url);
                continue;
            };
            if let Err(e) = self.storage.remove(name).await {
                warn!("Failed to remove upload '{}': {}", name, e);
            }
        }
    }

    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}{}/{}", self.public_base_url, UPLOADS_PATH, file_name)
    }

    fn file_name_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        let prefix = format!("{}{}/", self.public_base_url, UPLOADS_PATH);
        url.strip_prefix(prefix.as_str()).filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::LocalDiskStorage;
    use crate::shared::constants::MAX_REPORT_IMAGES;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn jpeg(name: &str) -> UploadedFile {
        UploadedFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    async fn service() -> (FileService, PathBuf) {
        let dir = std::env::temp_dir().join(format!("laporwarga-files-{}", Uuid::new_v4()));
        let storage = LocalDiskStorage::new(&dir).await.unwrap();
        (
            FileService::new(Arc::new(storage), "http://localhost:3000/"),
            dir,
        )
    }

    #[test]
    fn test_accepts_allowed_images() {
        let files = vec![
            jpeg("a.jpg"),
            UploadedFile::new("b.PNG", "image/png", vec![1]),
            UploadedFile::new("c.gif", "image/gif", vec![1]),
            UploadedFile::new("d.jpeg", "image/jpg", vec![1]),
        ];
        assert!(FileService::validate_images(&files, MAX_REPORT_IMAGES).is_ok());
    }

    #[test]
    fn test_too_many_images_is_validation_error() {
        let files: Vec<_> = (0..6).map(|i| jpeg(&format!("{}.jpg", i))).collect();
        assert!(matches!(
            FileService::validate_images(&files, MAX_REPORT_IMAGES),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_text_file_is_unsupported_media() {
        let files = vec![UploadedFile::new("notes.txt", "text/plain", b"hello".to_vec())];
        assert!(matches!(
            FileService::validate_images(&files, MAX_REPORT_IMAGES),
            Err(AppError::UnsupportedMedia(_))
        ));
    }

    #[test]
    fn test_image_mime_with_wrong_extension_is_unsupported_media() {
        let files = vec![UploadedFile::new("photo.webp", "image/jpeg", vec![1])];
        assert!(matches!(
            FileService::validate_images(&files, MAX_REPORT_IMAGES),
            Err(AppError::UnsupportedMedia(_))
        ));
    }

    #[test]
    fn test_oversized_image_is_validation_error() {
        let files = vec![UploadedFile::new(
            "big.png",
            "image/png",
            vec![0u8; MAX_IMAGE_SIZE + 1],
        )];
        assert!(matches!(
            FileService::validate_images(&files, MAX_REPORT_IMAGES),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_store_returns_urls_under_uploads() {
        let (service, dir) = service().await;

        let urls = service
            .store_images(&[jpeg("a.jpg"), jpeg("b.jpg")], MAX_REPORT_IMAGES)
            .await
            .unwrap();

        assert_eq!(urls.len(), 2);
        for url in &urls {
            let name = url
                .strip_prefix("http://localhost:3000/uploads/")
                .unwrap();
            assert!(name.ends_with(".jpg"));
            assert!(dir.join(name).exists());
        }
    }

    #[tokio::test]
    async fn test_rejected_batch_writes_nothing() {
        let (service, dir) = service().await;

        let result = service
            .store_images(
                &[jpeg("a.jpg"), UploadedFile::new("x.txt", "text/plain", vec![1])],
                MAX_REPORT_IMAGES,
            )
            .await;

        assert!(matches!(result, Err(AppError::UnsupportedMedia(_))));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_images_deletes_files() {
        let (service, dir) = service().await;
        let urls = service
            .store_images(&[jpeg("a.jpg")], MAX_REPORT_IMAGES)
            .await
            .unwrap();

        service.remove_images(&urls).await;

        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }
}

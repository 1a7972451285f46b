/// Maximum number of images attached to a single report
pub const MAX_REPORT_IMAGES: usize = 5;

/// Maximum size of a single uploaded image in bytes (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Declared content types accepted for image uploads
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// File extensions accepted for image uploads (lowercase, without dot)
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// URL path under which uploaded files are served
pub const UPLOADS_PATH: &str = "/uploads";

/// Request body limit for multipart routes: a full set of images plus form overhead
pub const MULTIPART_BODY_LIMIT: usize = MAX_REPORT_IMAGES * MAX_IMAGE_SIZE + 1024 * 1024;

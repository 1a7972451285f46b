pub mod models;
pub mod multipart;
pub mod services;

pub use models::UploadedFile;
pub use multipart::MultipartForm;
pub use services::FileService;

//! Multipart form reading shared by the report and article endpoints

use axum::extract::Multipart;
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::files::models::UploadedFile;

/// Fully buffered multipart form: text fields by name, file parts in arrival order
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Reads every part of the request. A part is a file when it carries a
    /// file name; empty file inputs (no name, no bytes) are dropped.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(|s| s.to_string()) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());

                    let data = field.bytes().await.map_err(|e| {
                        debug!("Failed to read file bytes: {}", e);
                        AppError::BadRequest(format!("Failed to read file data: {}", e))
                    })?;

                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }

                    form.files
                        .push((name, UploadedFile::new(file_name, content_type, data.to_vec())));
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// Text field value, or an empty string when absent
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    /// Removes and returns every file part sent under `name`
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        taken.into_iter().map(|(_, file)| file).collect()
    }
}

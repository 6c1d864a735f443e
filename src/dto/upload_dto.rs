use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::Part;

use crate::error::{Error, Result};

/// A file picked by the user, held in memory until the request is sent.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Validation(format!("{} is not a file", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        let mime = if self.file_name.to_ascii_lowercase().ends_with(".pdf") {
            "application/pdf"
        } else {
            "application/octet-stream"
        };
        Ok(Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name)
            .mime_str(mime)?)
    }
}

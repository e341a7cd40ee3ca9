use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Rejection;

pub const NO_FILE_SELECTED: &str = "No file selected";
pub const INVALID_FILENAME: &str = "Invalid filename";
pub const FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed";

/// Reported when the client did not declare a content type for the file part.
pub const UNKNOWN_FILE_TYPE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileUploaded {
    /// Always `true`
    pub success: bool,
    /// Name the file was stored under, after sanitization
    pub filename: String,
    /// Human readable size, e.g. `"1.5 KB"`
    pub file_size: String,
    /// Content type declared by the client; not verified
    pub file_type: String,
}

impl FileUploaded {
    pub fn new(filename: String, file_size: String, declared_type: Option<String>) -> Self {
        Self {
            success: true,
            filename,
            file_size,
            file_type: declared_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNKNOWN_FILE_TYPE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Uploaded(FileUploaded),
    Rejected(Rejection),
}

impl UploadResponse {
    pub fn rejected(error: &str) -> Self {
        UploadResponse::Rejected(Rejection::new(error))
    }
}

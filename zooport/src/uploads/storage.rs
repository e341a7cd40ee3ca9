use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Result of persisting an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Where the bytes were written
    pub path: PathBuf,
    /// Size of the file as reported by the filesystem after the write
    pub size_bytes: u64,
}

/// Trait for upload storage backends
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Write `content` under `filename`, replacing any existing file of that name.
    ///
    /// `filename` must already be sanitized to a single path component.
    async fn save(&self, filename: &str, content: Bytes) -> io::Result<StoredUpload>;
}

/// Stores uploads as plain files in one directory.
///
/// There is no locking and no staging: concurrent uploads of the same name race and the last
/// write wins.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    base_path: PathBuf,
}

impl LocalUploadStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create the upload directory (and parents) if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base_path).await
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(&self, filename: &str, content: Bytes) -> io::Result<StoredUpload> {
        let path = self.base_path.join(filename);

        fs::write(&path, &content).await?;
        let size_bytes = fs::metadata(&path).await?.len();

        debug!(path = %path.display(), size_bytes, "Wrote upload to disk");

        Ok(StoredUpload { path, size_bytes })
    }
}

//! Workspace abstraction trait
//!
//! This module defines the Workspace trait that request-scoped storage must implement.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An image persisted inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Upload position of the image.
    pub index: usize,
    /// Generated key, relative to the workspace root.
    pub key: String,
    /// Absolute path of the stored file.
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Request-scoped working storage
///
/// A workspace owns a directory that no other request can see. Everything a request
/// writes (images, encoder output) lives inside it.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Unique identifier of this workspace (also the directory name).
    fn id(&self) -> &str;

    /// Directory backing this workspace.
    fn root(&self) -> &Path;

    /// Persist image bytes under a freshly generated key.
    ///
    /// `extension` must be the sniffed image extension; client filenames are never used.
    async fn store_image(
        &self,
        index: usize,
        extension: &str,
        data: &[u8],
    ) -> StorageResult<StoredImage>;

    /// Read a stored file back by key
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Resolve a key to a path inside the workspace, rejecting anything that escapes it.
    fn path_for(&self, key: &str) -> StorageResult<PathBuf>;

    /// Path for an output file (e.g. the encoded video).
    fn output_path(&self, filename: &str) -> StorageResult<PathBuf> {
        self.path_for(filename)
    }
}

impl From<StorageError> for slidereel_core::AppError {
    fn from(err: StorageError) -> Self {
        use slidereel_core::AppError;
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::WriteFailed(msg) => AppError::Storage(msg),
            StorageError::ReadFailed(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidereel_core::{AppError, ErrorMetadata};

    #[test]
    fn test_from_storage_error_not_found() {
        let app_err: AppError = StorageError::NotFound("0000-a.png".to_string()).into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "0000-a.png"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_write_failed_is_sensitive() {
        let app_err: AppError = StorageError::WriteFailed("disk full".to_string()).into();
        assert_eq!(app_err.error_code(), "STORAGE_ERROR");
        assert!(app_err.is_sensitive());
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let app_err: AppError = StorageError::InvalidKey("bad".to_string()).into();
        assert_eq!(app_err.http_status_code(), 400);
    }
}

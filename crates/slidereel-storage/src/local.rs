use crate::keys::{generate_image_key, validate_key};
use crate::traits::{StorageError, StorageResult, StoredImage, Workspace};
use async_trait::async_trait;
use slidereel_core::constants::WORKSPACE_PREFIX;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem workspace
///
/// Backed by a uniquely named directory under the work root. The directory and
/// everything in it is removed when the workspace is dropped, unless it was created
/// with `keep = true`.
pub struct LocalWorkspace {
    dir: TempDir,
    id: String,
    keep: bool,
}

impl LocalWorkspace {
    /// Create a new workspace under `root`
    ///
    /// # Arguments
    /// * `root` - Work root shared by all workspaces (e.g., "uploads")
    /// * `keep` - Leave the directory on disk after drop (debugging)
    pub async fn create(root: impl Into<PathBuf>, keep: bool) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create work root {}: {}",
                root.display(),
                e
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .disable_cleanup(keep)
            .tempdir_in(&root)
            .map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create workspace in {}: {}",
                    root.display(),
                    e
                ))
            })?;

        let id = dir
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| StorageError::ConfigError("Workspace has no name".to_string()))?;

        tracing::debug!(workspace_id = %id, path = %dir.path().display(), "Workspace created");

        Ok(LocalWorkspace { dir, id, keep })
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.flush().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to flush file {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl Workspace for LocalWorkspace {
    fn id(&self) -> &str {
        &self.id
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    async fn store_image(
        &self,
        index: usize,
        extension: &str,
        data: &[u8],
    ) -> StorageResult<StoredImage> {
        let key = generate_image_key(index, extension)?;
        let path = self.path_for(&key)?;
        let start = std::time::Instant::now();

        self.write_file(&path, data).await?;

        tracing::debug!(
            workspace_id = %self.id,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image stored"
        );

        Ok(StoredImage {
            index,
            key,
            path,
            size_bytes: data.len() as u64,
        })
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        let path = self.dir.path().join(key);

        if path.parent() != Some(self.dir.path()) {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside workspace".to_string(),
            ));
        }

        Ok(path)
    }
}

impl Drop for LocalWorkspace {
    fn drop(&mut self) {
        if self.keep {
            tracing::info!(workspace_id = %self.id, path = %self.dir.path().display(), "Keeping workspace");
        } else {
            tracing::debug!(workspace_id = %self.id, "Removing workspace");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_read_image() {
        let root = tempfile::tempdir().unwrap();
        let ws = LocalWorkspace::create(root.path(), false).await.unwrap();

        let stored = ws.store_image(0, "png", b"fake png").await.unwrap();
        assert_eq!(stored.index, 0);
        assert_eq!(stored.size_bytes, 8);
        assert!(stored.path.starts_with(ws.root()));

        let data = ws.read(&stored.key).await.unwrap();
        assert_eq!(data, b"fake png");
    }

    #[tokio::test]
    async fn test_same_index_twice_does_not_overwrite() {
        let root = tempfile::tempdir().unwrap();
        let ws = LocalWorkspace::create(root.path(), false).await.unwrap();

        let first = ws.store_image(0, "png", b"first").await.unwrap();
        let second = ws.store_image(0, "png", b"second").await.unwrap();

        assert_ne!(first.key, second.key);
        assert_eq!(ws.read(&first.key).await.unwrap(), b"first");
        assert_eq!(ws.read(&second.key).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_workspaces_are_isolated() {
        let root = tempfile::tempdir().unwrap();
        let a = LocalWorkspace::create(root.path(), false).await.unwrap();
        let b = LocalWorkspace::create(root.path(), false).await.unwrap();

        assert_ne!(a.id(), b.id());
        assert_ne!(a.root(), b.root());
        assert!(a.id().starts_with(WORKSPACE_PREFIX));
        assert_eq!(
            a.output_path("output_video.mp4").unwrap().parent(),
            Some(a.root())
        );
    }

    #[tokio::test]
    async fn test_directory_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let ws = LocalWorkspace::create(root.path(), false).await.unwrap();
        let path = ws.root().to_path_buf();
        ws.store_image(0, "jpg", b"data").await.unwrap();
        assert!(path.exists());

        drop(ws);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_keep_leaves_directory() {
        let root = tempfile::tempdir().unwrap();
        let ws = LocalWorkspace::create(root.path(), true).await.unwrap();
        let path = ws.root().to_path_buf();

        drop(ws);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let root = tempfile::tempdir().unwrap();
        let ws = LocalWorkspace::create(root.path(), false).await.unwrap();

        assert!(matches!(
            ws.path_for("../escape.png"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            ws.output_path("/tmp/out.mp4"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_read_missing_key() {
        let root = tempfile::tempdir().unwrap();
        let ws = LocalWorkspace::create(root.path(), false).await.unwrap();

        assert!(matches!(
            ws.read("0000-missing.png").await,
            Err(StorageError::NotFound(_))
        ));
    }
}

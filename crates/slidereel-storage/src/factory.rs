//! Workspace provider

use crate::local::LocalWorkspace;
use crate::traits::{StorageResult, Workspace};
use std::path::{Path, PathBuf};

/// Hands out a fresh, isolated [`Workspace`] per request.
#[derive(Debug, Clone)]
pub struct WorkspaceProvider {
    root: PathBuf,
    keep_workspaces: bool,
}

impl WorkspaceProvider {
    pub fn new(root: impl Into<PathBuf>, keep_workspaces: bool) -> Self {
        Self {
            root: root.into(),
            keep_workspaces,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the work root if needed and check that it is writable.
    pub async fn ensure_root(&self) -> StorageResult<()> {
        let probe = LocalWorkspace::create(&self.root, false).await?;
        drop(probe);
        Ok(())
    }

    pub async fn create(&self) -> StorageResult<Box<dyn Workspace>> {
        let workspace = LocalWorkspace::create(&self.root, self.keep_workspaces).await?;
        Ok(Box::new(workspace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_root_lazily() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("uploads");
        let provider = WorkspaceProvider::new(&root, false);

        provider.ensure_root().await.unwrap();
        assert!(root.is_dir());

        let ws = provider.create().await.unwrap();
        assert!(ws.root().starts_with(&root));
    }
}

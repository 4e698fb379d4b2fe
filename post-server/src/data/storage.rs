use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, error};

use crate::domain::error::DomainError;
use crate::domain::upload::UploadedFile;

/// File storage keyed by directory plus a content-derived filename.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Writes the file under `directory` and returns its storage-relative path.
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, DomainError>;
    async fn exists(&self, path: &str) -> Result<bool, DomainError>;
}

/// Stores files on the local filesystem below `root`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        safe.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, DomainError> {
        let directory = directory.trim_matches('/');
        let dir_path = self
            .resolve(directory)
            .ok_or_else(|| DomainError::Storage(format!("invalid directory: {directory}")))?;

        fs::create_dir_all(&dir_path).await.map_err(|e| {
            error!("failed to create storage directory {}: {}", dir_path.display(), e);
            DomainError::Storage(e.to_string())
        })?;

        let name = file.hash_name();
        let target = dir_path.join(&name);
        fs::write(&target, &file.bytes).await.map_err(|e| {
            error!("failed to write {}: {}", target.display(), e);
            DomainError::Storage(e.to_string())
        })?;

        let relative = format!("{directory}/{name}");
        debug!(path = %relative, bytes = file.len(), "file stored");
        Ok(relative)
    }

    async fn exists(&self, path: &str) -> Result<bool, DomainError> {
        let Some(full) = self.resolve(path) else {
            return Ok(false);
        };
        fs::try_exists(&full)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))
    }
}

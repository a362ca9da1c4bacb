use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::instrument;

use crate::domain::{
    common::entities::app_errors::CoreError,
    storage::{entities::ContainerEntry, ports::ArtifactStore},
};

/// Artifact store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Creates the results root if it does not exist yet.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, CoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            tracing::error!(root = %root.display(), error = %e, "Failed to create results directory");
            CoreError::Storage(format!("Failed to create {}: {}", root.display(), e))
        })?;

        tracing::info!(root = %root.display(), "Using local results directory");

        Ok(Self { root })
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

fn storage_error(action: &str, path: &Path, e: std::io::Error) -> CoreError {
    if e.kind() == ErrorKind::NotFound {
        return CoreError::NotFound(format!("{} does not exist", path.display()));
    }

    tracing::error!(path = %path.display(), error = %e, "Failed to {}", action);
    CoreError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

impl ArtifactStore for LocalArtifactStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn write_bytes(&self, path: &str, data: Bytes) -> Result<(), CoreError> {
        let full_path = self.full_path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create", parent, e))?;
        }

        fs::write(&full_path, &data)
            .await
            .map_err(|e| storage_error("write", &full_path, e))
    }

    #[instrument(skip(self))]
    async fn read_bytes(&self, path: &str) -> Result<Bytes, CoreError> {
        let full_path = self.full_path(path);
        fs::read(&full_path)
            .await
            .map(Bytes::from)
            .map_err(|e| storage_error("read", &full_path, e))
    }

    async fn exists(&self, path: &str) -> Result<bool, CoreError> {
        let full_path = self.full_path(path);
        fs::try_exists(&full_path)
            .await
            .map_err(|e| storage_error("inspect", &full_path, e))
    }

    #[instrument(skip(self))]
    async fn ensure_container(&self, container: &str) -> Result<(), CoreError> {
        let full_path = self.full_path(container);
        fs::create_dir_all(&full_path)
            .await
            .map_err(|e| storage_error("create", &full_path, e))
    }

    async fn container_exists(&self, container: &str) -> Result<bool, CoreError> {
        match fs::metadata(self.full_path(container)).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error("inspect", &self.full_path(container), e)),
        }
    }

    #[instrument(skip(self))]
    async fn list_containers(&self) -> Result<Vec<ContainerEntry>, CoreError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| storage_error("list", &self.root, e))?;

        let mut containers = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error("list", &self.root, e))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| storage_error("inspect", &entry.path(), e))?;
            if !metadata.is_dir() {
                continue;
            }

            let modified_at: DateTime<Utc> = metadata
                .modified()
                .map_err(|e| storage_error("inspect", &entry.path(), e))?
                .into();

            containers.push(ContainerEntry::new(
                entry.file_name().to_string_lossy().into_owned(),
                modified_at,
            ));
        }

        Ok(containers)
    }

    #[instrument(skip(self))]
    async fn list_objects(&self, container: &str) -> Result<Vec<String>, CoreError> {
        let dir = self.full_path(container);
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| storage_error("list", &dir, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error("list", &dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| storage_error("inspect", &entry.path(), e))?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    fn locate(&self, path: &str) -> String {
        self.full_path(path).display().to_string()
    }
}

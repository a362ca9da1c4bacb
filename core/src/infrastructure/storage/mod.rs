use bytes::Bytes;

use crate::{
    domain::{
        common::{StorageConfig, entities::app_errors::CoreError},
        storage::{entities::ContainerEntry, ports::ArtifactStore},
    },
    infrastructure::object_storage::s3::S3ArtifactStore,
};

pub mod local;

use local::LocalArtifactStore;

/// Storage backend selected by configuration at startup.
#[derive(Debug, Clone)]
pub enum ArtifactStorage {
    Local(LocalArtifactStore),
    ObjectStorage(S3ArtifactStore),
}

impl ArtifactStorage {
    pub async fn from_config(config: &StorageConfig) -> Result<Self, CoreError> {
        match config {
            StorageConfig::Local { results_dir } => Ok(ArtifactStorage::Local(
                LocalArtifactStore::new(results_dir).await?,
            )),
            StorageConfig::ObjectStorage(config) => Ok(ArtifactStorage::ObjectStorage(
                S3ArtifactStore::new(config.clone()),
            )),
        }
    }
}

impl ArtifactStore for ArtifactStorage {
    async fn write_bytes(&self, path: &str, data: Bytes) -> Result<(), CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.write_bytes(path, data).await,
            ArtifactStorage::ObjectStorage(store) => store.write_bytes(path, data).await,
        }
    }

    async fn read_bytes(&self, path: &str) -> Result<Bytes, CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.read_bytes(path).await,
            ArtifactStorage::ObjectStorage(store) => store.read_bytes(path).await,
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.exists(path).await,
            ArtifactStorage::ObjectStorage(store) => store.exists(path).await,
        }
    }

    async fn ensure_container(&self, container: &str) -> Result<(), CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.ensure_container(container).await,
            ArtifactStorage::ObjectStorage(store) => store.ensure_container(container).await,
        }
    }

    async fn container_exists(&self, container: &str) -> Result<bool, CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.container_exists(container).await,
            ArtifactStorage::ObjectStorage(store) => store.container_exists(container).await,
        }
    }

    async fn list_containers(&self) -> Result<Vec<ContainerEntry>, CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.list_containers().await,
            ArtifactStorage::ObjectStorage(store) => store.list_containers().await,
        }
    }

    async fn list_objects(&self, container: &str) -> Result<Vec<String>, CoreError> {
        match self {
            ArtifactStorage::Local(store) => store.list_objects(container).await,
            ArtifactStorage::ObjectStorage(store) => store.list_objects(container).await,
        }
    }

    fn locate(&self, path: &str) -> String {
        match self {
            ArtifactStorage::Local(store) => store.locate(path),
            ArtifactStorage::ObjectStorage(store) => store.locate(path),
        }
    }
}

use std::future::Future;

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::common::entities::app_errors::CoreError;

use super::entities::ContainerEntry;

/// Port for request artifact storage (local filesystem or S3).
///
/// Paths are opaque `/`-separated keys relative to the results root. The
/// first segment of a path names the request container.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactStore: Send + Sync {
    /// Write raw bytes, creating missing parents and overwriting any
    /// existing object.
    fn write_bytes(
        &self,
        path: &str,
        data: Bytes,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Read raw bytes. Fails with `NotFound` if the object is absent.
    fn read_bytes(&self, path: &str) -> impl Future<Output = Result<Bytes, CoreError>> + Send;

    fn exists(&self, path: &str) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Idempotent create of a request container.
    fn ensure_container(
        &self,
        container: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn container_exists(
        &self,
        container: &str,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// All containers directly under the results root.
    fn list_containers(&self) -> impl Future<Output = Result<Vec<ContainerEntry>, CoreError>> + Send;

    /// Object names (not full paths) directly inside a container, sorted.
    fn list_objects(
        &self,
        container: &str,
    ) -> impl Future<Output = Result<Vec<String>, CoreError>> + Send;

    /// Human readable location of a path, for logs and CLI output.
    fn locate(&self, path: &str) -> String;
}

/// JSON helpers available on every [`ArtifactStore`].
pub trait ArtifactStoreExt: ArtifactStore {
    /// Serialize as pretty-printed JSON and write, overwriting.
    fn write_json<T>(
        &self,
        path: &str,
        value: &T,
    ) -> impl Future<Output = Result<(), CoreError>> + Send
    where
        T: Serialize + Sync,
    {
        async move {
            let payload = serde_json::to_vec_pretty(value).map_err(|e| {
                CoreError::Format(format!("Failed to serialize {}: {}", path, e))
            })?;
            self.write_bytes(path, Bytes::from(payload)).await
        }
    }

    /// Read and decode JSON. `NotFound` if absent, `Format` if the content
    /// does not decode into `T`.
    fn read_json<T>(&self, path: &str) -> impl Future<Output = Result<T, CoreError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move {
            let data = self.read_bytes(path).await?;
            serde_json::from_slice(&data).map_err(|e| {
                tracing::error!(path = %path, error = %e, "Stored artifact is not valid JSON");
                CoreError::Format(format!("{}: {}", path, e))
            })
        }
    }
}

impl<S: ArtifactStore + ?Sized> ArtifactStoreExt for S {}

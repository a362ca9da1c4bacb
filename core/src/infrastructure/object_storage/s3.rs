use std::collections::BTreeMap;

use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::domain::{
    common::{ObjectStorageConfig, entities::app_errors::CoreError},
    storage::{entities::ContainerEntry, ports::ArtifactStore},
};

/// Artifact store on an S3 compatible bucket (AWS or MinIO).
///
/// A request container is a key prefix; its modification time is the newest
/// `last_modified` among its objects.
#[derive(Debug, Clone)]
pub struct S3ArtifactStore {
    client: Client,
    bucket: String,
    key_prefix: String,
}

impl S3ArtifactStore {
    pub fn new(config: ObjectStorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "fridgechef",
        );

        let endpoint = config.endpoint.trim_end_matches('/');

        tracing::info!(
            endpoint = %endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 client"
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true);
        if !endpoint.is_empty() {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket,
            key_prefix: config.key_prefix.trim_matches('/').to_string(),
        }
    }

    fn object_key(&self, path: &str) -> String {
        object_key(&self.key_prefix, path)
    }

    /// Key prefix under which every container lives, with a trailing `/`
    /// unless empty.
    fn root_prefix(&self) -> String {
        if self.key_prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", self.key_prefix)
        }
    }

    fn container_prefix(&self, container: &str) -> String {
        format!("{}/", self.object_key(container.trim_end_matches('/')))
    }
}

fn object_key(key_prefix: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if key_prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", key_prefix, path)
    }
}

fn content_type_for(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => "application/json",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn to_chrono(value: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

/// Tracks the newest modification time per container over one page of
/// listed keys. Keys outside `root`, or sitting directly under it, belong to
/// no container. A missing `last_modified` counts as the epoch.
fn fold_container_times<'a>(
    latest: &mut BTreeMap<String, DateTime<Utc>>,
    root: &str,
    objects: impl IntoIterator<Item = (&'a str, Option<DateTime<Utc>>)>,
) {
    for (key, last_modified) in objects {
        let Some((container, _)) = key
            .strip_prefix(root)
            .and_then(|rest| rest.split_once('/'))
        else {
            continue;
        };
        if container.is_empty() {
            continue;
        }

        let modified_at = last_modified.unwrap_or(DateTime::UNIX_EPOCH);
        latest
            .entry(container.to_string())
            .and_modify(|current| *current = (*current).max(modified_at))
            .or_insert(modified_at);
    }
}

/// Object names directly inside `prefix`. Folder markers and nested keys
/// are dropped.
fn object_names<'a>(prefix: &str, keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    keys.into_iter()
        .filter_map(|key| key.strip_prefix(prefix))
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .map(str::to_string)
        .collect()
}

impl ArtifactStore for S3ArtifactStore {
    #[instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn write_bytes(&self, path: &str, data: Bytes) -> Result<(), CoreError> {
        let key = self.object_key(path);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type_for(path))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Failed to upload object");
                CoreError::Storage(format!("Failed to upload {}: {}", key, e))
            })?;

        tracing::debug!(key = %key, "Object uploaded");
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn read_bytes(&self, path: &str) -> Result<Bytes, CoreError> {
        let key = self.object_key(path);

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    return CoreError::NotFound(format!("{} does not exist", self.locate(path)));
                }
                tracing::error!(error = %e, key = %key, "Failed to download object");
                CoreError::Storage(format!("Failed to download {}: {}", key, e))
            })?;

        let body = output.body.collect().await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to read object body");
            CoreError::Storage(format!("Failed to read {}: {}", key, e))
        })?;

        Ok(body.into_bytes())
    }

    async fn exists(&self, path: &str) -> Result<bool, CoreError> {
        let key = self.object_key(path);

        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Failed to inspect object");
                Err(CoreError::Storage(format!(
                    "Failed to inspect {}: {}",
                    key, e
                )))
            }
        }
    }

    // Prefixes come into existence with their first object.
    async fn ensure_container(&self, _container: &str) -> Result<(), CoreError> {
        Ok(())
    }

    async fn container_exists(&self, container: &str) -> Result<bool, CoreError> {
        let prefix = self.container_prefix(container);

        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .max_keys(1)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, prefix = %prefix, "Failed to list objects");
                CoreError::Storage(format!("Failed to list {}: {}", prefix, e))
            })?;

        Ok(!output.contents().is_empty())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list_containers(&self) -> Result<Vec<ContainerEntry>, CoreError> {
        let root = self.root_prefix();
        let mut latest: BTreeMap<String, DateTime<Utc>> = BTreeMap::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&root)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to list containers");
                    CoreError::Storage(format!("Failed to list {}: {}", self.bucket, e))
                })?;

            fold_container_times(
                &mut latest,
                &root,
                output.contents().iter().filter_map(|object| {
                    Some((object.key()?, object.last_modified().and_then(to_chrono)))
                }),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(latest
            .into_iter()
            .map(|(name, modified_at)| ContainerEntry::new(name, modified_at))
            .collect())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list_objects(&self, container: &str) -> Result<Vec<String>, CoreError> {
        let prefix = self.container_prefix(container);
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&prefix)
                .delimiter("/")
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, prefix = %prefix, "Failed to list objects");
                    CoreError::Storage(format!("Failed to list {}: {}", prefix, e))
                })?;

            names.extend(object_names(
                &prefix,
                output.contents().iter().filter_map(|object| object.key()),
            ));

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        names.sort();
        Ok(names)
    }

    fn locate(&self, path: &str) -> String {
        format!("s3://{}/{}", self.bucket, self.object_key(path))
    }
}

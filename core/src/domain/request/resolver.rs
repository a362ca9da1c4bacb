use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_random_hex, generate_timestamp},
    request::entities::{RequestLookup, RequestManifest, RequestPaths},
    storage::ports::{ArtifactStore, ArtifactStoreExt},
};

const REQUEST_PREFIX: &str = "fridge";
const SUFFIX_BYTES: usize = 4;
const MAX_ID_ATTEMPTS: usize = 5;
const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

static SUFFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]{1,64}$").expect("valid suffix pattern"));
static EXTENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").expect("valid extension pattern"));
static REQUEST_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("valid id pattern"));
/// Names produced by `new_request_paths`. Anything else under the results
/// root is not a request.
static REQUEST_DIR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^fridge_\d+_[A-Za-z0-9-]+$").expect("valid request dir pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Image,
    Ingredients,
    Recipes,
}

impl ArtifactKind {
    fn prefix(self) -> &'static str {
        match self {
            ArtifactKind::Image => "image_",
            ArtifactKind::Ingredients => "ingredients_",
            ArtifactKind::Recipes => "recipes_",
        }
    }
}

/// Maps uploads and request identifiers onto storage paths.
pub struct RequestResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for RequestResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> RequestResolver<S>
where
    S: ArtifactStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Allocates a request for a new upload and writes its manifest.
    ///
    /// The suffix is reused from `original_filename` when it carries one
    /// (`anything_<suffix>.ext`), otherwise a random token is drawn. A
    /// container that already exists for the candidate id forces a fresh
    /// random suffix.
    #[instrument(skip(self))]
    pub async fn resolve_for_new_request(
        &self,
        original_filename: Option<&str>,
    ) -> Result<RequestPaths, CoreError> {
        let filename = base_name(original_filename.unwrap_or_default().trim());
        let extension = image_extension(filename);
        let mut suffix =
            embedded_suffix(filename).unwrap_or_else(|| generate_random_hex(SUFFIX_BYTES));

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let (created_at, timestamp) = generate_timestamp();
            let paths = new_request_paths(timestamp, &suffix, &extension);

            if self.store.container_exists(&paths.request_dir).await? {
                tracing::warn!(
                    request_id = %paths.request_id,
                    attempt,
                    "Request id already taken, drawing a new suffix"
                );
                suffix = generate_random_hex(SUFFIX_BYTES);
                continue;
            }

            self.store.ensure_container(&paths.request_dir).await?;
            self.store
                .write_json(
                    &paths.manifest_path(),
                    &RequestManifest::new(&paths, created_at),
                )
                .await?;

            tracing::info!(
                request_id = %paths.request_id,
                request_dir = %self.store.locate(&paths.request_dir),
                "Request created"
            );

            return Ok(paths);
        }

        Err(CoreError::Storage(format!(
            "could not allocate a unique request id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    /// Resolves the paths of a previously created request.
    ///
    /// Uses the manifest when present. Requests stored without one are
    /// resolved by prefix search over the container, synthesizing the
    /// expected name for any artifact not written yet.
    #[instrument(skip(self))]
    pub async fn resolve_for_existing(&self, request_id: &str) -> Result<RequestPaths, CoreError> {
        validate_request_id(request_id)?;

        if !self.store.container_exists(request_id).await? {
            return Err(CoreError::NotFound(format!(
                "Request {} not found",
                request_id
            )));
        }

        let manifest_path = format!("{}/{}", request_id, super::entities::MANIFEST_FILE);
        if self.store.exists(&manifest_path).await? {
            let manifest: RequestManifest = self.store.read_json(&manifest_path).await?;
            if manifest.request_id != request_id {
                return Err(CoreError::Format(format!(
                    "{}: manifest belongs to {}",
                    manifest_path, manifest.request_id
                )));
            }
            return RequestPaths::try_from(manifest);
        }

        let objects = self.store.list_objects(request_id).await?;
        tracing::debug!(
            request_id = %request_id,
            objects = objects.len(),
            "No manifest, discovering artifacts by prefix"
        );

        Ok(discover_paths(request_id, &objects))
    }

    /// Resolves the most recently modified request.
    #[instrument(skip(self))]
    pub async fn resolve_latest(&self) -> Result<RequestPaths, CoreError> {
        let containers = self.store.list_containers().await?;

        let latest = containers
            .into_iter()
            .filter(|container| REQUEST_DIR_PATTERN.is_match(&container.name))
            .max_by(|a, b| {
                a.modified_at
                    .cmp(&b.modified_at)
                    .then_with(|| a.name.cmp(&b.name))
            })
            .ok_or_else(|| {
                CoreError::NotFound(
                    "No previous request found. Please analyze an image first.".to_string(),
                )
            })?;

        self.resolve_for_existing(&latest.name).await
    }

    pub async fn resolve(&self, lookup: &RequestLookup) -> Result<RequestPaths, CoreError> {
        match lookup {
            RequestLookup::ById(request_id) => self.resolve_for_existing(request_id).await,
            RequestLookup::Latest => self.resolve_latest().await,
        }
    }
}

fn new_request_paths(timestamp: i64, suffix: &str, extension: &str) -> RequestPaths {
    let tail = format!("{}_{}", timestamp, suffix);
    let request_id = format!("{}_{}", REQUEST_PREFIX, tail);

    RequestPaths {
        image_path: format!("{}/image_{}.{}", request_id, tail, extension),
        ingredients_path: format!("{}/ingredients_{}.json", request_id, tail),
        recipes_path: format!("{}/recipes_{}.json", request_id, tail),
        request_dir: request_id.clone(),
        request_id,
    }
}

fn discover_paths(request_id: &str, objects: &[String]) -> RequestPaths {
    let tail = request_id
        .split_once('_')
        .map(|(_, tail)| tail)
        .unwrap_or(request_id);

    let find = |kind: ArtifactKind, extension: &str| {
        let name = objects
            .iter()
            .find(|name| name.starts_with(kind.prefix()))
            .cloned()
            .unwrap_or_else(|| format!("{}{}.{}", kind.prefix(), tail, extension));
        format!("{}/{}", request_id, name)
    };

    RequestPaths {
        request_id: request_id.to_string(),
        request_dir: request_id.to_string(),
        image_path: find(ArtifactKind::Image, DEFAULT_IMAGE_EXTENSION),
        ingredients_path: find(ArtifactKind::Ingredients, "json"),
        recipes_path: find(ArtifactKind::Recipes, "json"),
    }
}

fn base_name(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename)
}

/// `fridge_abc123.jpg` -> `abc123`. Only filenames containing `_` carry one.
fn embedded_suffix(filename: &str) -> Option<String> {
    if !filename.contains('_') {
        return None;
    }

    let segment = filename.rsplit('_').next()?;
    let segment = segment.split('.').next().unwrap_or_default();

    SUFFIX_PATTERN
        .is_match(segment)
        .then(|| segment.to_string())
}

fn image_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .map(|(_, extension)| extension)
        .filter(|extension| EXTENSION_PATTERN.is_match(extension))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}

fn validate_request_id(request_id: &str) -> Result<(), CoreError> {
    if REQUEST_ID_PATTERN.is_match(request_id) && !request_id.contains("..") {
        Ok(())
    } else {
        Err(CoreError::Invalid(format!(
            "invalid request id: {:?}",
            request_id
        )))
    }
}

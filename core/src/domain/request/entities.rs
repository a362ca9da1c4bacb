use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::common::{entities::app_errors::CoreError, generate_timestamp};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const STATUS_FILE: &str = "status.json";

/// Storage locations of every artifact belonging to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestPaths {
    pub request_id: String,
    pub request_dir: String,
    pub image_path: String,
    pub ingredients_path: String,
    pub recipes_path: String,
}

impl RequestPaths {
    pub fn manifest_path(&self) -> String {
        format!("{}/{}", self.request_dir, MANIFEST_FILE)
    }

    pub fn status_path(&self) -> String {
        format!("{}/{}", self.request_dir, STATUS_FILE)
    }

    /// Final path segment of the stored image.
    pub fn image_name(&self) -> &str {
        self.image_path
            .rsplit('/')
            .next()
            .unwrap_or(self.image_path.as_str())
    }
}

/// Index record persisted next to the artifacts when a request is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestManifest {
    pub request_id: String,
    pub image_path: String,
    pub ingredients_path: String,
    pub recipes_path: String,
    pub created_at: DateTime<Utc>,
}

impl RequestManifest {
    pub fn new(paths: &RequestPaths, created_at: DateTime<Utc>) -> Self {
        Self {
            request_id: paths.request_id.clone(),
            image_path: paths.image_path.clone(),
            ingredients_path: paths.ingredients_path.clone(),
            recipes_path: paths.recipes_path.clone(),
            created_at,
        }
    }
}

impl TryFrom<RequestManifest> for RequestPaths {
    type Error = CoreError;

    /// Every recorded artifact must sit directly inside the request's own
    /// container.
    fn try_from(manifest: RequestManifest) -> Result<Self, Self::Error> {
        for path in [
            &manifest.image_path,
            &manifest.ingredients_path,
            &manifest.recipes_path,
        ] {
            let name = path
                .strip_prefix(manifest.request_id.as_str())
                .and_then(|rest| rest.strip_prefix('/'));

            let contained = name.is_some_and(|name| {
                !name.is_empty() && !name.contains('/') && !name.contains('\\') && name != ".."
            });
            if !contained {
                return Err(CoreError::Format(format!(
                    "manifest path {:?} is outside request {}",
                    path, manifest.request_id
                )));
            }
        }

        Ok(Self {
            request_dir: manifest.request_id.clone(),
            request_id: manifest.request_id,
            image_path: manifest.image_path,
            ingredients_path: manifest.ingredients_path,
            recipes_path: manifest.recipes_path,
        })
    }
}

/// How a caller designates the request it wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLookup {
    ById(String),
    Latest,
}

impl From<Option<String>> for RequestLookup {
    fn from(request_id: Option<String>) -> Self {
        match request_id {
            Some(id) if !id.trim().is_empty() => RequestLookup::ById(id.trim().to_string()),
            _ => RequestLookup::Latest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    Pending,
    Complete,
    Failed,
}

/// Progress record for the analysis of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestStatus {
    pub request_id: String,
    pub state: RequestState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RequestStatus {
    fn new(request_id: &str, state: RequestState, reason: Option<String>) -> Self {
        let (now, _) = generate_timestamp();
        Self {
            request_id: request_id.to_string(),
            state,
            reason,
            updated_at: now,
        }
    }

    pub fn pending(request_id: &str) -> Self {
        Self::new(request_id, RequestState::Pending, None)
    }

    pub fn complete(request_id: &str) -> Self {
        Self::new(request_id, RequestState::Complete, None)
    }

    pub fn failed(request_id: &str, reason: impl Into<String>) -> Self {
        Self::new(request_id, RequestState::Failed, Some(reason.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_optional_id() {
        assert_eq!(RequestLookup::from(None), RequestLookup::Latest);
        assert_eq!(
            RequestLookup::from(Some("  ".to_string())),
            RequestLookup::Latest
        );
        assert_eq!(
            RequestLookup::from(Some("fridge_1_abc".to_string())),
            RequestLookup::ById("fridge_1_abc".to_string())
        );
    }

    #[test]
    fn test_failed_status_serializes_reason() {
        let status = RequestStatus::failed("fridge_1_abc", "model unreachable");
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["state"], "failed");
        assert_eq!(value["reason"], "model unreachable");

        let pending = serde_json::to_value(RequestStatus::pending("fridge_1_abc")).unwrap();
        assert_eq!(pending["state"], "pending");
        assert!(pending.get("reason").is_none());
    }

    #[test]
    fn test_image_name_is_last_segment() {
        let paths = RequestPaths {
            request_id: "fridge_1_abc".to_string(),
            request_dir: "fridge_1_abc".to_string(),
            image_path: "fridge_1_abc/image_1_abc.png".to_string(),
            ingredients_path: "fridge_1_abc/ingredients_1_abc.json".to_string(),
            recipes_path: "fridge_1_abc/recipes_1_abc.json".to_string(),
        };
        assert_eq!(paths.image_name(), "image_1_abc.png");
        assert_eq!(paths.status_path(), "fridge_1_abc/status.json");
    }

    #[test]
    fn test_manifest_paths_must_stay_inside_request() {
        let paths = RequestPaths {
            request_id: "fridge_1_abc".to_string(),
            request_dir: "fridge_1_abc".to_string(),
            image_path: "fridge_1_abc/image_1_abc.jpg".to_string(),
            ingredients_path: "fridge_1_abc/ingredients_1_abc.json".to_string(),
            recipes_path: "fridge_1_abc/recipes_1_abc.json".to_string(),
        };
        let manifest = RequestManifest::new(&paths, Utc::now());
        assert_eq!(RequestPaths::try_from(manifest.clone()).unwrap(), paths);

        for image_path in [
            "other_request/image_1_abc.jpg",
            "fridge_1_abc/../other_request/image.jpg",
            "fridge_1_abcdef/image_1_abc.jpg",
            "fridge_1_abc/",
            "image_1_abc.jpg",
        ] {
            let tampered = RequestManifest {
                image_path: image_path.to_string(),
                ..manifest.clone()
            };
            let err = RequestPaths::try_from(tampered).unwrap_err();
            assert!(matches!(err, CoreError::Format(_)), "{}", image_path);
        }
    }
}

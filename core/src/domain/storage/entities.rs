use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level container (directory or key prefix) under the results root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub name: String,
    pub modified_at: DateTime<Utc>,
}

impl ContainerEntry {
    pub fn new(name: impl Into<String>, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            modified_at,
        }
    }
}

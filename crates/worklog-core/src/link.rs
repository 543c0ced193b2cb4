//! Evidence links attached to a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::LinkType;

/// Stored as link metadata when none is given.
pub const EMPTY_METADATA: &str = "{}";

/// A reference (pull request, thread, document, ...) attached to a task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub id: String,

    pub task_id: String,

    #[serde(rename = "type", default)]
    pub link_type: LinkType,

    pub url: String,

    /// Falls back to `url` when blank.
    #[serde(default)]
    pub title: String,

    /// Free text; not an enumeration.
    #[serde(default)]
    pub status: String,

    /// Opaque payload, usually a JSON object.
    #[serde(default)]
    pub metadata: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a link of the given type pointing at `url`.
    pub fn new(task_id: impl Into<String>, link_type: LinkType, url: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            link_type,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Fills in the title and metadata defaults.
    pub fn apply_defaults(&mut self) {
        if self.title.trim().is_empty() {
            self.title = self.url.clone();
        }
        if self.metadata.trim().is_empty() {
            self.metadata = EMPTY_METADATA.to_string();
        }
    }
}

//! Timestamped notes on a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,

    pub task_id: String,

    pub content: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(task_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

//! The [`Task`] work item and its builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskStatus};

/// Stored as the external reference when a task has none.
pub const NO_EXTERNAL_REF: &str = "NO-JIRA";

/// A unit of tracked work.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the repository on create when empty.
    #[serde(default)]
    pub id: String,

    /// Ticket reference in an outside tracker.
    #[serde(default)]
    pub external_ref: String,

    pub title: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: TaskStatus,

    /// Insertion order is preserved.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub blockers: Vec<String>,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Fills in values that have a documented default when left blank.
    pub fn apply_defaults(&mut self) {
        if self.external_ref.trim().is_empty() {
            self.external_ref = NO_EXTERNAL_REF.to_string();
        }
    }

    /// Returns `true` if the task carries the archived status.
    pub fn is_archived(&self) -> bool {
        self.status == TaskStatus::Archived
    }
}

/// Builder for [`Task`], mostly used by tests and the CLI.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    /// Creates a new builder with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        let task = Task {
            title: title.into(),
            ..Task::default()
        };
        Self { task }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.task.id = id.into();
        self
    }

    pub fn external_ref(mut self, external_ref: impl Into<String>) -> Self {
        self.task.external_ref = external_ref.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.task.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn blocker(mut self, blocker: impl Into<String>) -> Self {
        self.task.blockers.push(blocker.into());
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_defaults() {
        let task = TaskBuilder::new("Write docs").build();
        assert_eq!(task.title, "Write docs");
        assert!(task.id.is_empty());
        assert_eq!(task.priority, Priority::Normal);
        assert_eq!(task.status, TaskStatus::New);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn apply_defaults_fills_external_ref() {
        let mut task = TaskBuilder::new("x").external_ref("   ").build();
        task.apply_defaults();
        assert_eq!(task.external_ref, NO_EXTERNAL_REF);

        let mut task = TaskBuilder::new("x").external_ref("OPS-12").build();
        task.apply_defaults();
        assert_eq!(task.external_ref, "OPS-12");
    }

    #[test]
    fn serde_roundtrip() {
        let task = TaskBuilder::new("Ship it")
            .id("tsk-abc")
            .priority(Priority::Critical)
            .status(TaskStatus::InProgress)
            .tags(["release", "backend"])
            .blocker("waiting on review")
            .build();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"in_progress\""));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"title":"bare"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::New);
        assert!(task.blockers.is_empty());
        assert!(!task.is_archived());
    }
}

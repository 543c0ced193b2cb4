//! Validation rules for tasks, links and comments.
//!
//! Validation is pure: it inspects the entity and never touches storage.

use crate::comment::Comment;
use crate::enums::{LinkType, Priority, TaskStatus};
use crate::link::Link;
use crate::task::Task;

/// A required field was missing or a value was outside its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn one_of(
    field: &'static str,
    value: &str,
    valid: bool,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if valid {
        return Ok(());
    }
    Err(ValidationError::new(
        field,
        format!("invalid value {value:?} (expected one of: {})", allowed.join(", ")),
    ))
}

/// Validates a task.
pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    require("title", &task.title)?;
    one_of(
        "priority",
        task.priority.as_str(),
        task.priority.is_valid(),
        Priority::VARIANTS,
    )?;
    one_of(
        "status",
        task.status.as_str(),
        task.status.is_valid(),
        TaskStatus::VARIANTS,
    )?;
    Ok(())
}

/// Validates a link.
pub fn validate_link(link: &Link) -> Result<(), ValidationError> {
    require("task_id", &link.task_id)?;
    require("url", &link.url)?;
    one_of(
        "type",
        link.link_type.as_str(),
        link.link_type.is_valid(),
        LinkType::VARIANTS,
    )
}

/// Validates a comment.
pub fn validate_comment(comment: &Comment) -> Result<(), ValidationError> {
    require("task_id", &comment.task_id)?;
    require("content", &comment.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_task_passes() {
        let task = TaskBuilder::new("Valid task").priority(Priority::High).build();
        assert!(validate_task(&task).is_ok());
    }

    #[test]
    fn empty_title_fails() {
        for title in ["", "   "] {
            let err = validate_task(&TaskBuilder::new(title).build()).unwrap_err();
            assert_eq!(err.field, "title");
        }
    }

    #[test]
    fn long_title_passes() {
        let task = TaskBuilder::new("x".repeat(10_000)).build();
        assert!(validate_task(&task).is_ok());
    }

    #[test]
    fn unknown_priority_rejected() {
        let task = TaskBuilder::new("t").priority(Priority::from("urgent")).build();
        let err = validate_task(&task).unwrap_err();
        assert_eq!(err.field, "priority");
        assert!(err.message.contains("critical"));
    }

    #[test]
    fn unknown_status_rejected() {
        let task = TaskBuilder::new("t").status(TaskStatus::from("closed")).build();
        assert_eq!(validate_task(&task).unwrap_err().field, "status");
    }

    #[test]
    fn link_requires_task_and_url() {
        let link = Link::new("", LinkType::Other, "https://x");
        assert_eq!(validate_link(&link).unwrap_err().field, "task_id");

        let link = Link::new("tsk-1", LinkType::Other, "");
        assert_eq!(validate_link(&link).unwrap_err().field, "url");
    }

    #[test]
    fn link_type_must_be_known() {
        let link = Link::new("tsk-1", LinkType::from("wiki"), "https://x");
        assert_eq!(validate_link(&link).unwrap_err().field, "type");
    }

    #[test]
    fn comment_requires_content() {
        assert_eq!(
            validate_comment(&Comment::new("tsk-1", "")).unwrap_err().field,
            "content"
        );
        assert_eq!(
            validate_comment(&Comment::new("", "hi")).unwrap_err().field,
            "task_id"
        );
        assert!(validate_comment(&Comment::new("tsk-1", "hi")).is_ok());
    }

    #[test]
    fn display_includes_field() {
        let err = ValidationError::new("title", "is required");
        assert_eq!(err.to_string(), "title: is required");
    }
}

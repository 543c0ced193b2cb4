//! Filter types for task queries.

use crate::enums::{Priority, TaskStatus};

/// Filter for listing tasks.
///
/// Empty vectors place no restriction. Archived tasks are hidden unless
/// `include_archived` is set or `statuses` names [`TaskStatus::Archived`]
/// explicitly.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// OR semantics: task status must be one of these.
    pub statuses: Vec<TaskStatus>,
    /// OR semantics: task priority must be one of these.
    pub priorities: Vec<Priority>,

    pub include_archived: bool,

    /// Maximum rows; zero or negative means unbounded.
    pub limit: i64,
    /// Rows to skip; zero or negative means none.
    pub offset: i64,
}

impl TaskFilter {
    /// Returns `true` when the implicit `status != archived` clause applies.
    pub fn excludes_archived(&self) -> bool {
        !self.include_archived && !self.statuses.contains(&TaskStatus::Archived)
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn including_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_filter_defaults() {
        let f = TaskFilter::default();
        assert!(f.statuses.is_empty());
        assert!(f.priorities.is_empty());
        assert!(!f.include_archived);
        assert_eq!(f.limit, 0);
        assert!(f.excludes_archived());
    }

    #[test]
    fn explicit_archived_status_disables_exclusion() {
        let f = TaskFilter::default().with_statuses([TaskStatus::Archived, TaskStatus::Done]);
        assert!(!f.excludes_archived());
    }

    #[test]
    fn include_archived_disables_exclusion() {
        let f = TaskFilter::default()
            .with_statuses([TaskStatus::New])
            .including_archived();
        assert!(!f.excludes_archived());
    }
}

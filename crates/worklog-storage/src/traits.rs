//! The [`Repository`] trait -- the public API for task persistence.
//!
//! Consumers (the CLI, HTTP handlers, tests) depend on this trait rather than
//! on [`SqliteStore`](crate::SqliteStore) so that alternative backends can be
//! substituted. All SQL construction stays behind it.

use worklog_core::comment::Comment;
use worklog_core::filter::TaskFilter;
use worklog_core::link::Link;
use worklog_core::task::Task;

use crate::error::Result;
use crate::sqlite::migrations::MigrationReport;

/// Primary storage interface for tasks, links and comments.
///
/// Every method is synchronous and maps to one round trip to the store.
/// Each single-entity write is atomic; sequences of calls are not.
pub trait Repository: Send + Sync {
    // -- Tasks ---------------------------------------------------------------

    /// Validates and inserts a task.
    ///
    /// Fills in the ID (if empty), `created_at`, `updated_at` and the
    /// external-reference default on the passed task.
    fn create_task(&self, task: &mut Task) -> Result<()>;

    /// Retrieves a task by ID.
    fn get_task(&self, id: &str) -> Result<Task>;

    /// Rewrites every column of an existing task and refreshes `updated_at`.
    ///
    /// Updating an ID that does not exist is not an error.
    fn update_task(&self, task: &mut Task) -> Result<()>;

    /// Deletes a task together with its links and comments. Missing IDs are
    /// ignored.
    fn delete_task(&self, id: &str) -> Result<()>;

    /// Lists tasks matching the filter, newest first.
    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Counts tasks matching the filter, ignoring its limit and offset.
    fn count_tasks(&self, filter: &TaskFilter) -> Result<i64>;

    /// Case-insensitive substring search over title, external reference and
    /// the encoded tag list. `limit <= 0` means unbounded.
    fn search_tasks(&self, query: &str, include_archived: bool, limit: i64) -> Result<Vec<Task>>;

    // -- Links ---------------------------------------------------------------

    /// Validates and inserts a link, filling in its ID, title default and
    /// `created_at`.
    fn create_link(&self, link: &mut Link) -> Result<()>;

    fn get_link(&self, id: &str) -> Result<Link>;

    /// Rewrites every mutable column of a link.
    fn update_link(&self, link: &mut Link) -> Result<()>;

    fn delete_link(&self, id: &str) -> Result<()>;

    /// Returns a task's links, oldest first.
    fn get_task_links(&self, task_id: &str) -> Result<Vec<Link>>;

    // -- Comments ------------------------------------------------------------

    /// Validates and inserts a comment, filling in its ID and `created_at`.
    fn create_comment(&self, comment: &mut Comment) -> Result<()>;

    fn get_comment(&self, id: &str) -> Result<Comment>;

    fn update_comment(&self, comment: &Comment) -> Result<()>;

    fn delete_comment(&self, id: &str) -> Result<()>;

    /// Returns a task's comments in chronological order.
    fn get_task_comments(&self, task_id: &str) -> Result<Vec<Comment>>;

    // -- Lifecycle -----------------------------------------------------------

    /// Applies any pending schema migrations. Already-applied versions are
    /// skipped.
    fn run_migrations(&self) -> Result<MigrationReport>;

    /// Closes the underlying connection, reporting any error from doing so.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

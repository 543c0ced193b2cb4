//! Storage backend for worklog.
//!
//! Provides the [`Repository`] trait and a SQLite implementation
//! ([`SqliteStore`]) with versioned schema migrations.

pub mod error;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::{Result, StorageError};
pub use sqlite::{ConnectionOptions, MigrationReport, SqliteStore};
pub use traits::Repository;

// ---------------------------------------------------------------------------
// Repository trait implementation for SqliteStore
// ---------------------------------------------------------------------------

use worklog_core::comment::Comment;
use worklog_core::filter::TaskFilter;
use worklog_core::link::Link;
use worklog_core::task::Task;

impl Repository for SqliteStore {
    fn create_task(&self, task: &mut Task) -> Result<()> {
        self.create_task_impl(task)
    }

    fn get_task(&self, id: &str) -> Result<Task> {
        self.get_task_impl(id)
    }

    fn update_task(&self, task: &mut Task) -> Result<()> {
        self.update_task_impl(task)
    }

    fn delete_task(&self, id: &str) -> Result<()> {
        self.delete_task_impl(id)
    }

    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.list_tasks_impl(filter)
    }

    fn count_tasks(&self, filter: &TaskFilter) -> Result<i64> {
        self.count_tasks_impl(filter)
    }

    fn search_tasks(&self, query: &str, include_archived: bool, limit: i64) -> Result<Vec<Task>> {
        self.search_tasks_impl(query, include_archived, limit)
    }

    fn create_link(&self, link: &mut Link) -> Result<()> {
        self.create_link_impl(link)
    }

    fn get_link(&self, id: &str) -> Result<Link> {
        self.get_link_impl(id)
    }

    fn update_link(&self, link: &mut Link) -> Result<()> {
        self.update_link_impl(link)
    }

    fn delete_link(&self, id: &str) -> Result<()> {
        self.delete_link_impl(id)
    }

    fn get_task_links(&self, task_id: &str) -> Result<Vec<Link>> {
        self.get_task_links_impl(task_id)
    }

    fn create_comment(&self, comment: &mut Comment) -> Result<()> {
        self.create_comment_impl(comment)
    }

    fn get_comment(&self, id: &str) -> Result<Comment> {
        self.get_comment_impl(id)
    }

    fn update_comment(&self, comment: &Comment) -> Result<()> {
        self.update_comment_impl(comment)
    }

    fn delete_comment(&self, id: &str) -> Result<()> {
        self.delete_comment_impl(id)
    }

    fn get_task_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        self.get_task_comments_impl(task_id)
    }

    fn run_migrations(&self) -> Result<MigrationReport> {
        self.run_migrations_impl()
    }

    fn close(self) -> Result<()> {
        self.close_impl()
    }
}

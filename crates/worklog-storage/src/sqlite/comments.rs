//! Comment CRUD operations for [`SqliteStore`].

use rusqlite::{Row, params};
use tracing::debug;

use worklog_core::comment::Comment;
use worklog_core::idgen::COMMENT_PREFIX;
use worklog_core::validation::validate_comment;

use crate::error::{Result, StorageError, query_err, tx_err};
use crate::sqlite::ids::next_id;
use crate::sqlite::store::SqliteStore;
use crate::sqlite::timestamps::{format_datetime, get_datetime, now};

const ENTITY: &str = "comment";

fn scan_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        content: row.get("content")?,
        created_at: get_datetime(row, "created_at")?,
    })
}

impl SqliteStore {
    /// Validates and inserts a comment stamped with the current time.
    pub fn create_comment_impl(&self, comment: &mut Comment) -> Result<()> {
        validate_comment(comment)?;
        let now = now();

        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(tx_err(ENTITY, "begin"))?;

        let id = if comment.id.is_empty() {
            next_id(&tx, "comments", COMMENT_PREFIX, &comment.content, now)?
        } else {
            comment.id.clone()
        };

        tx.execute(
            "INSERT INTO comments (id, task_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, comment.task_id, comment.content, format_datetime(&now)],
        )
        .map_err(query_err(ENTITY, "insert"))?;
        tx.commit().map_err(tx_err(ENTITY, "commit"))?;

        debug!(id = %id, task_id = %comment.task_id, "created comment");
        comment.id = id;
        comment.created_at = now;
        Ok(())
    }

    /// Retrieves a comment by ID.
    pub fn get_comment_impl(&self, id: &str) -> Result<Comment> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT id, task_id, content, created_at FROM comments WHERE id = ?1",
            params![id],
            scan_comment,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StorageError::not_found(ENTITY, id),
            other => query_err(ENTITY, "get")(other),
        })
    }

    /// Replaces a comment's content.
    pub fn update_comment_impl(&self, comment: &Comment) -> Result<()> {
        validate_comment(comment)?;
        let conn = self.lock_conn()?;
        let affected = conn
            .execute(
                "UPDATE comments SET content = ?1 WHERE id = ?2",
                params![comment.content, comment.id],
            )
            .map_err(query_err(ENTITY, "update"))?;
        debug!(id = %comment.id, affected, "updated comment");
        Ok(())
    }

    /// Deletes a comment. A missing ID is a no-op.
    pub fn delete_comment_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn
            .execute("DELETE FROM comments WHERE id = ?1", params![id])
            .map_err(query_err(ENTITY, "delete"))?;
        debug!(id, affected, "deleted comment");
        Ok(())
    }

    /// Returns all comments for a task in chronological order.
    pub fn get_task_comments_impl(&self, task_id: &str) -> Result<Vec<Comment>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, task_id, content, created_at FROM comments WHERE task_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )
            .map_err(query_err(ENTITY, "list"))?;
        let rows = stmt
            .query_map(params![task_id], scan_comment)
            .map_err(query_err(ENTITY, "list"))?;

        let mut comments = Vec::new();
        for row in rows {
            comments.push(row.map_err(query_err(ENTITY, "list"))?);
        }
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use worklog_core::task::TaskBuilder;

    fn store_with_task() -> (SqliteStore, String) {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut task = TaskBuilder::new("Parent").build();
        store.create_task_impl(&mut task).unwrap();
        (store, task.id)
    }

    #[test]
    fn add_and_get_comment() {
        let (store, task_id) = store_with_task();
        let mut comment = Comment::new(&task_id, "Looks good");
        store.create_comment_impl(&mut comment).unwrap();

        assert!(comment.id.starts_with("cmt-"));
        assert_eq!(store.get_comment_impl(&comment.id).unwrap(), comment);
    }

    #[test]
    fn created_at_is_always_stamped() {
        let (store, task_id) = store_with_task();
        let mut comment = Comment::new(&task_id, "backdated");
        comment.created_at = chrono::DateTime::<chrono::Utc>::default();
        store.create_comment_impl(&mut comment).unwrap();
        assert!(comment.created_at > chrono::DateTime::<chrono::Utc>::default());
    }

    #[test]
    fn empty_content_is_rejected() {
        let (store, task_id) = store_with_task();
        let mut comment = Comment::new(&task_id, "  ");
        let err = store.create_comment_impl(&mut comment).unwrap_err();
        assert_eq!(err.validation_field(), Some("content"));
        assert!(store.get_task_comments_impl(&task_id).unwrap().is_empty());
    }

    #[test]
    fn comments_are_chronological() {
        let (store, task_id) = store_with_task();
        for text in ["first", "second", "third"] {
            let mut comment = Comment::new(&task_id, text);
            store.create_comment_impl(&mut comment).unwrap();
        }

        let contents: Vec<String> = store
            .get_task_comments_impl(&task_id)
            .unwrap()
            .into_iter()
            .map(|c| c.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn update_and_delete() {
        let (store, task_id) = store_with_task();
        let mut comment = Comment::new(&task_id, "draft");
        store.create_comment_impl(&mut comment).unwrap();

        comment.content = "final".into();
        store.update_comment_impl(&comment).unwrap();
        assert_eq!(store.get_comment_impl(&comment.id).unwrap().content, "final");

        store.delete_comment_impl(&comment.id).unwrap();
        assert!(store.get_comment_impl(&comment.id).unwrap_err().is_not_found());
    }
}

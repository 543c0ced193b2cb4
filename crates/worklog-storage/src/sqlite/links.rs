//! Link CRUD operations for [`SqliteStore`].

use rusqlite::{Row, params};
use tracing::debug;

use worklog_core::idgen::LINK_PREFIX;
use worklog_core::link::Link;
use worklog_core::validation::validate_link;

use crate::error::{Result, StorageError, query_err, tx_err};
use crate::sqlite::ids::next_id;
use crate::sqlite::store::SqliteStore;
use crate::sqlite::timestamps::{format_datetime, get_datetime, now};

const ENTITY: &str = "link";

const LINK_COLUMNS: &str = "id, task_id, type, url, title, status, metadata, created_at";

fn scan_link(row: &Row<'_>) -> rusqlite::Result<Link> {
    let link_type: String = row.get("type")?;
    Ok(Link {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        link_type: link_type.into(),
        url: row.get("url")?,
        title: row.get("title")?,
        status: row.get("status")?,
        metadata: row.get("metadata")?,
        created_at: get_datetime(row, "created_at")?,
    })
}

impl SqliteStore {
    /// Validates and inserts a link. The title defaults to the URL.
    pub fn create_link_impl(&self, link: &mut Link) -> Result<()> {
        validate_link(link)?;
        link.apply_defaults();
        let now = now();

        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(tx_err(ENTITY, "begin"))?;

        let id = if link.id.is_empty() {
            next_id(&tx, "links", LINK_PREFIX, &link.url, now)?
        } else {
            link.id.clone()
        };

        tx.execute(
            &format!("INSERT INTO links ({LINK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                id,
                link.task_id,
                link.link_type.as_str(),
                link.url,
                link.title,
                link.status,
                link.metadata,
                format_datetime(&now),
            ],
        )
        .map_err(query_err(ENTITY, "insert"))?;
        tx.commit().map_err(tx_err(ENTITY, "commit"))?;

        debug!(id = %id, task_id = %link.task_id, "created link");
        link.id = id;
        link.created_at = now;
        Ok(())
    }

    /// Retrieves a link by ID.
    pub fn get_link_impl(&self, id: &str) -> Result<Link> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = ?1");
        conn.query_row(&sql, params![id], scan_link)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::not_found(ENTITY, id),
                other => query_err(ENTITY, "get")(other),
            })
    }

    /// Rewrites a link's type, URL, title, status and metadata.
    pub fn update_link_impl(&self, link: &mut Link) -> Result<()> {
        validate_link(link)?;
        link.apply_defaults();

        let conn = self.lock_conn()?;
        let affected = conn
            .execute(
                "UPDATE links SET type = ?1, url = ?2, title = ?3, status = ?4, metadata = ?5
                 WHERE id = ?6",
                params![
                    link.link_type.as_str(),
                    link.url,
                    link.title,
                    link.status,
                    link.metadata,
                    link.id,
                ],
            )
            .map_err(query_err(ENTITY, "update"))?;
        debug!(id = %link.id, affected, "updated link");
        Ok(())
    }

    /// Deletes a link. A missing ID is a no-op.
    pub fn delete_link_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn
            .execute("DELETE FROM links WHERE id = ?1", params![id])
            .map_err(query_err(ENTITY, "delete"))?;
        debug!(id, affected, "deleted link");
        Ok(())
    }

    /// Returns a task's links, oldest first.
    pub fn get_task_links_impl(&self, task_id: &str) -> Result<Vec<Link>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE task_id = ?1
                 ORDER BY created_at ASC, rowid ASC"
            ))
            .map_err(query_err(ENTITY, "list"))?;
        let rows = stmt
            .query_map(params![task_id], scan_link)
            .map_err(query_err(ENTITY, "list"))?;

        let mut links = Vec::new();
        for row in rows {
            links.push(row.map_err(query_err(ENTITY, "list"))?);
        }
        Ok(links)
    }
}

//! Task CRUD, listing and search for [`SqliteStore`].

use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};
use tracing::debug;

use worklog_core::enums::TaskStatus;
use worklog_core::filter::TaskFilter;
use worklog_core::idgen::TASK_PREFIX;
use worklog_core::task::Task;
use worklog_core::validation::validate_task;

use crate::error::{Result, StorageError, query_err, tx_err};
use crate::sqlite::ids::next_id;
use crate::sqlite::query::QueryBuilder;
use crate::sqlite::store::SqliteStore;
use crate::sqlite::timestamps::{format_datetime, get_datetime, now};

const ENTITY: &str = "task";

/// All task columns in a deterministic order for SELECT and INSERT.
pub(crate) const TASK_COLUMNS: &str =
    "id, external_ref, title, priority, status, tags, blockers, created_at, updated_at";

/// Newest first; rowid breaks ties between tasks created in the same
/// millisecond.
const TASK_ORDER: &str = "created_at DESC, rowid DESC";

/// Columns matched by free-text search. `tags` is the encoded list text.
const SEARCH_COLUMNS: &[&str] = &["title", "external_ref", "tags"];

// ---------------------------------------------------------------------------
// Row scanning
// ---------------------------------------------------------------------------

/// A task row before its list columns are decoded.
struct TaskRow {
    id: String,
    external_ref: String,
    title: String,
    priority: String,
    status: String,
    tags: String,
    blockers: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

fn scan_task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get("id")?,
        external_ref: row.get("external_ref")?,
        title: row.get("title")?,
        priority: row.get("priority")?,
        status: row.get("status")?,
        tags: row.get("tags")?,
        blockers: row.get("blockers")?,
        created_at: get_datetime(row, "created_at")?,
        updated_at: get_datetime(row, "updated_at")?,
    })
}

// ---------------------------------------------------------------------------
// SqliteStore task methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    /// Validates and inserts a task, filling in its ID, timestamps and
    /// external-reference default.
    pub fn create_task_impl(&self, task: &mut Task) -> Result<()> {
        validate_task(task)?;
        task.apply_defaults();
        let tags = self.encode_list("tags", &task.tags)?;
        let blockers = self.encode_list("blockers", &task.blockers)?;
        let now = now();
        let now_str = format_datetime(&now);

        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(tx_err(ENTITY, "begin"))?;

        let id = if task.id.is_empty() {
            next_id(&tx, "tasks", TASK_PREFIX, &task.title, now)?
        } else {
            task.id.clone()
        };

        let sql = format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        );
        tx.execute(
            &sql,
            params![
                id,
                task.external_ref,
                task.title,
                task.priority.as_str(),
                task.status.as_str(),
                tags,
                blockers,
                now_str,
                now_str,
            ],
        )
        .map_err(query_err(ENTITY, "insert"))?;
        tx.commit().map_err(tx_err(ENTITY, "commit"))?;

        debug!(id = %id, "created task");
        task.id = id;
        task.created_at = now;
        task.updated_at = now;
        Ok(())
    }

    /// Retrieves a task by ID.
    pub fn get_task_impl(&self, id: &str) -> Result<Task> {
        let raw = {
            let conn = self.lock_conn()?;
            let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
            conn.query_row(&sql, params![id], scan_task_row)
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => StorageError::not_found(ENTITY, id),
                    other => query_err(ENTITY, "get")(other),
                })?
        };
        self.decode_task(raw)
    }

    /// Rewrites every mutable column of a task and refreshes `updated_at`.
    /// `created_at` is left as stored.
    pub fn update_task_impl(&self, task: &mut Task) -> Result<()> {
        validate_task(task)?;
        task.apply_defaults();
        let tags = self.encode_list("tags", &task.tags)?;
        let blockers = self.encode_list("blockers", &task.blockers)?;
        let now = now();

        let conn = self.lock_conn()?;
        let affected = conn
            .execute(
                "UPDATE tasks
                 SET external_ref = ?1, title = ?2, priority = ?3, status = ?4,
                     tags = ?5, blockers = ?6, updated_at = ?7
                 WHERE id = ?8",
                params![
                    task.external_ref,
                    task.title,
                    task.priority.as_str(),
                    task.status.as_str(),
                    tags,
                    blockers,
                    format_datetime(&now),
                    task.id,
                ],
            )
            .map_err(query_err(ENTITY, "update"))?;

        if affected == 0 {
            debug!(id = %task.id, "update matched no task");
        } else {
            debug!(id = %task.id, "updated task");
        }
        task.updated_at = now;
        Ok(())
    }

    /// Deletes a task and its links and comments. A missing ID is a no-op.
    pub fn delete_task_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(tx_err(ENTITY, "begin"))?;

        if !self.cascade_enforced {
            delete_dependents(&tx, id)?;
        }
        let affected = tx
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(query_err(ENTITY, "delete"))?;

        tx.commit().map_err(tx_err(ENTITY, "commit"))?;
        debug!(id, affected, "deleted task");
        Ok(())
    }

    /// Lists tasks matching `filter`, newest first.
    pub fn list_tasks_impl(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let (sql, values) = task_predicates(filter).build(
            &format!("SELECT {TASK_COLUMNS} FROM tasks"),
            TASK_ORDER,
            filter.limit,
            filter.offset,
        );
        self.query_tasks(&sql, &values, "list")
    }

    /// Counts tasks matching `filter`, ignoring its paging.
    pub fn count_tasks_impl(&self, filter: &TaskFilter) -> Result<i64> {
        let (sql, values) = task_predicates(filter).build_unordered("SELECT COUNT(*) FROM tasks");
        let conn = self.lock_conn()?;
        conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))
            .map_err(query_err(ENTITY, "count"))
    }

    /// Case-insensitive substring search over title, external reference and
    /// the encoded tag list.
    ///
    /// Because `tags` is matched as encoded text, a query can match across
    /// adjacent tag tokens (e.g. `a","b` against `["a","b"]`).
    pub fn search_tasks_impl(
        &self,
        query: &str,
        include_archived: bool,
        limit: i64,
    ) -> Result<Vec<Task>> {
        let filter = TaskFilter {
            include_archived,
            ..TaskFilter::default()
        };
        let mut qb = task_predicates(&filter);
        qb.push_contains_any(SEARCH_COLUMNS, query);
        let (sql, values) = qb.build(
            &format!("SELECT {TASK_COLUMNS} FROM tasks"),
            TASK_ORDER,
            limit,
            0,
        );
        self.query_tasks(&sql, &values, "search")
    }

    // -- helpers -------------------------------------------------------------

    fn query_tasks(&self, sql: &str, values: &[Value], op: &'static str) -> Result<Vec<Task>> {
        let raws = {
            let conn = self.lock_conn()?;
            let mut stmt = conn.prepare(sql).map_err(query_err(ENTITY, op))?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), scan_task_row)
                .map_err(query_err(ENTITY, op))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_err(ENTITY, op))?
        };
        raws.into_iter().map(|raw| self.decode_task(raw)).collect()
    }

    fn encode_list(&self, field: &'static str, items: &[String]) -> Result<String> {
        self.codec
            .encode(items)
            .map_err(|source| StorageError::Encode {
                entity: ENTITY,
                field,
                source,
            })
    }

    fn decode_list(&self, field: &'static str, id: &str, text: &str) -> Result<Vec<String>> {
        self.codec.decode(text).map_err(|source| StorageError::Decode {
            entity: ENTITY,
            field,
            id: id.to_string(),
            source,
        })
    }

    fn decode_task(&self, raw: TaskRow) -> Result<Task> {
        let tags = self.decode_list("tags", &raw.id, &raw.tags)?;
        let blockers = self.decode_list("blockers", &raw.id, &raw.blockers)?;
        Ok(Task {
            id: raw.id,
            external_ref: raw.external_ref,
            title: raw.title,
            priority: raw.priority.into(),
            status: raw.status.into(),
            tags,
            blockers,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

/// Builds the WHERE predicates shared by list, count and search.
fn task_predicates(filter: &TaskFilter) -> QueryBuilder {
    let mut qb = QueryBuilder::new();
    qb.push_in(
        "status",
        filter.statuses.iter().map(|s| s.as_str().to_string()),
    );
    qb.push_in(
        "priority",
        filter.priorities.iter().map(|p| p.as_str().to_string()),
    );
    if filter.excludes_archived() {
        qb.push(
            "status != ?",
            vec![Value::from(TaskStatus::Archived.as_str().to_string())],
        );
    }
    qb
}

/// Removes a task's links and comments when the engine will not cascade.
fn delete_dependents(conn: &Connection, task_id: &str) -> Result<()> {
    conn.execute("DELETE FROM links WHERE task_id = ?1", params![task_id])
        .map_err(query_err("link", "delete"))?;
    conn.execute("DELETE FROM comments WHERE task_id = ?1", params![task_id])
        .map_err(query_err("comment", "delete"))?;
    Ok(())
}

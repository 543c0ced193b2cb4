//! The migration registry: DDL for every schema version.
//!
//! Timestamps are stored as TEXT in ISO 8601 format (SQLite has no native
//! datetime type). List columns hold the list codec's text and are never NULL.
//! Every statement uses `IF NOT EXISTS` so a body can be replayed against a
//! database that already has its objects.

use crate::sqlite::migrations::Migration;

/// Name of the bookkeeping table.
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

/// DDL for the bookkeeping table, executed before any registry entry.
pub const MIGRATIONS_TABLE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        version    INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL
    )
"#;

/// All schema migrations, in version order. Append only.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_tasks",
        sql: r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id           TEXT PRIMARY KEY,
            external_ref TEXT NOT NULL DEFAULT 'NO-JIRA',
            title        TEXT NOT NULL,
            priority     TEXT NOT NULL DEFAULT 'normal',
            status       TEXT NOT NULL DEFAULT 'new',
            tags         TEXT NOT NULL DEFAULT '[]',
            blockers     TEXT NOT NULL DEFAULT '[]',
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
        CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority);
        CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
        "#,
    },
    Migration {
        version: 2,
        name: "create_links",
        sql: r#"
        CREATE TABLE IF NOT EXISTS links (
            id         TEXT PRIMARY KEY,
            task_id    TEXT NOT NULL,
            type       TEXT NOT NULL DEFAULT 'other',
            url        TEXT NOT NULL,
            title      TEXT NOT NULL DEFAULT '',
            status     TEXT NOT NULL DEFAULT '',
            metadata   TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_links_task_id ON links(task_id);
        "#,
    },
    Migration {
        version: 3,
        name: "create_comments",
        sql: r#"
        CREATE TABLE IF NOT EXISTS comments (
            id         TEXT PRIMARY KEY,
            task_id    TEXT NOT NULL,
            content    TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_comments_task_id ON comments(task_id);
        "#,
    },
    Migration {
        version: 4,
        name: "index_external_ref",
        sql: "CREATE INDEX IF NOT EXISTS idx_tasks_external_ref ON tasks(external_ref);",
    },
];

/// Highest version in [`MIGRATIONS`].
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

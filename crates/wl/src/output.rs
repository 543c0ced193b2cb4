//! Output formatting helpers for the `wl` CLI.
//!
//! JSON output, aligned tables, and human-readable task, link and comment
//! display.

use std::io::{self, Write};

use serde::Serialize;
use worklog_core::comment::Comment;
use worklog_core::link::Link;
use worklog_core::task::Task;

/// A task with its links and comments, as printed by `wl show`.
#[derive(Serialize)]
pub struct TaskDetail<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub links: &'a [Link],
    pub comments: &'a [Comment],
}

/// Prints a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            // Ignore broken pipe errors (e.g., piped to `head`).
            let _ = writeln!(io::stdout().lock(), "{json}");
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {e}");
            std::process::exit(1);
        }
    }
}

/// Renders rows under `headers` with columns padded to their widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let separators: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![
        render_row(headers.to_vec()),
        render_row(separators.iter().map(String::as_str).collect()),
    ];
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// Prints a table to stdout. Nothing is printed for an empty row set.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{}", render_table(headers, rows));
}

/// Format: `{id} [{priority}] {title} ({status})`
pub fn format_task_compact(task: &Task) -> String {
    format!("{} [{}] {} ({})", task.id, task.priority, task.title, task.status)
}

/// Multi-line view of a task and its sub-entities.
pub fn format_task_detail(task: &Task, links: &[Link], comments: &[Comment]) -> String {
    let mut lines = vec![
        format!("{} {}", task.id, task.title),
        format!("Status: {}    Priority: {}", task.status, task.priority),
        format!("External ref: {}", task.external_ref),
        format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M")),
        format!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M")),
    ];
    if !task.tags.is_empty() {
        lines.push(format!("Tags: {}", task.tags.join(", ")));
    }
    if !task.blockers.is_empty() {
        lines.push(format!("Blocked by: {}", task.blockers.join(", ")));
    }

    if !links.is_empty() {
        lines.push(String::new());
        lines.push("LINKS".to_string());
        lines.extend(links.iter().map(|l| format!("  {}", format_link_line(l))));
    }
    if !comments.is_empty() {
        lines.push(String::new());
        lines.push("COMMENTS".to_string());
        lines.extend(comments.iter().map(|c| format!("  {}", format_comment_line(c))));
    }
    lines.join("\n")
}

/// Column values for [`output_table`] in `wl list` and `wl search`.
pub fn format_task_row(task: &Task) -> Vec<String> {
    vec![
        task.id.clone(),
        task.priority.to_string(),
        task.status.to_string(),
        task.external_ref.clone(),
        task.title.clone(),
    ]
}

pub const TASK_HEADERS: &[&str] = &["ID", "PRIORITY", "STATUS", "REF", "TITLE"];

/// Format: `{id} [{type}] {title} <{url}>`, with the status appended when set.
pub fn format_link_line(link: &Link) -> String {
    let mut line = format!("{} [{}] {}", link.id, link.link_type, link.title);
    if link.title != link.url {
        line.push_str(&format!(" <{}>", link.url));
    }
    if !link.status.is_empty() {
        line.push_str(&format!(" ({})", link.status));
    }
    line
}

/// Format: `{id} {timestamp}: {content}`
pub fn format_comment_line(comment: &Comment) -> String {
    format!(
        "{} {}: {}",
        comment.id,
        comment.created_at.format("%Y-%m-%d %H:%M"),
        comment.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use worklog_core::enums::{LinkType, Priority};
    use worklog_core::task::TaskBuilder;

    #[test]
    fn compact_format_basic() {
        let task = TaskBuilder::new("Fix the bug")
            .id("tsk-abc123")
            .priority(Priority::High)
            .build();
        assert_eq!(format_task_compact(&task), "tsk-abc123 [high] Fix the bug (new)");
    }

    #[test]
    fn detail_lists_links_and_comments() {
        let task = TaskBuilder::new("Ship").id("tsk-1").tag("release").build();
        let mut link = Link::new("tsk-1", LinkType::PullRequest, "https://git.example/pr/1");
        link.id = "lnk-1".into();
        link.title = "Release PR".into();
        let mut comment = Comment::new("tsk-1", "ready to merge");
        comment.id = "cmt-1".into();

        let detail = format_task_detail(&task, &[link], &[comment]);
        assert!(detail.contains("Tags: release"));
        assert!(detail.contains(
            "LINKS\n  lnk-1 [pull_request] Release PR <https://git.example/pr/1>"
        ));
        assert!(detail.contains("COMMENTS\n  cmt-1 "));
        assert!(detail.ends_with("ready to merge"));
    }

    #[test]
    fn link_line_omits_url_when_used_as_title() {
        let mut link = Link::new("tsk-1", LinkType::Other, "https://x.example");
        link.id = "lnk-2".into();
        link.apply_defaults();
        link.status = "open".into();
        assert_eq!(format_link_line(&link), "lnk-2 [other] https://x.example (open)");
    }

    #[test]
    fn table_columns_are_aligned() {
        let rows = vec![
            vec!["tsk-1".to_string(), "A long title".to_string()],
            vec!["tsk-22".to_string(), "B".to_string()],
        ];
        let table = render_table(&["ID", "TITLE"], &rows);
        assert_eq!(
            table,
            "ID      TITLE\n------  ------------\ntsk-1   A long title\ntsk-22  B"
        );
    }

    #[test]
    fn task_detail_json_flattens_task() {
        let task = TaskBuilder::new("Ship").id("tsk-1").build();
        let value = serde_json::to_value(TaskDetail {
            task: &task,
            links: &[],
            comments: &[],
        })
        .unwrap();
        assert_eq!(value["id"], "tsk-1");
        assert_eq!(value["links"], serde_json::json!([]));
    }
}

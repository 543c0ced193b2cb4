//! Task commands: `wl create`, `show`, `list`, `search`, `update`, `delete`.

use anyhow::{Context, Result};
use serde_json::json;

use worklog_core::enums::{Priority, TaskStatus};
use worklog_core::filter::TaskFilter;
use worklog_core::task::{Task, TaskBuilder};
use worklog_storage::{Repository, SqliteStore};

use crate::cli::{CreateArgs, DeleteArgs, ListArgs, SearchArgs, ShowArgs, UpdateArgs};
use crate::context::RuntimeContext;
use crate::output::{
    TASK_HEADERS, TaskDetail, format_task_compact, format_task_detail, format_task_row,
    output_json, output_table,
};

/// Execute the `wl create` command.
pub fn run_create(ctx: &RuntimeContext, store: &SqliteStore, args: &CreateArgs) -> Result<()> {

    let mut builder = TaskBuilder::new(&args.title).tags(&args.tags);
    if let Some(external_ref) = &args.external_ref {
        builder = builder.external_ref(external_ref);
    }
    if let Some(priority) = &args.priority {
        builder = builder.priority(Priority::from(priority.as_str()));
    }
    if let Some(status) = &args.status {
        builder = builder.status(TaskStatus::from(status.as_str()));
    }
    for blocker in &args.blockers {
        builder = builder.blocker(blocker);
    }
    let mut task = builder.build();

    store.create_task(&mut task).context("failed to create task")?;

    if ctx.json {
        output_json(&task);
    } else {
        println!("Created {}", format_task_compact(&task));
    }
    Ok(())
}

/// Execute the `wl show` command.
pub fn run_show(ctx: &RuntimeContext, store: &SqliteStore, args: &ShowArgs) -> Result<()> {
    let task = store.get_task(&args.id)?;
    let links = store
        .get_task_links(&task.id)
        .with_context(|| format!("failed to load links of {}", task.id))?;
    let comments = store
        .get_task_comments(&task.id)
        .with_context(|| format!("failed to load comments of {}", task.id))?;

    if ctx.json {
        output_json(&TaskDetail {
            task: &task,
            links: &links,
            comments: &comments,
        });
    } else {
        println!("{}", format_task_detail(&task, &links, &comments));
    }
    Ok(())
}

/// Execute the `wl list` command.
pub fn run_list(ctx: &RuntimeContext, store: &SqliteStore, args: &ListArgs) -> Result<()> {

    let mut filter = TaskFilter::default()
        .with_statuses(args.statuses.iter().map(|s| TaskStatus::from(s.as_str())))
        .with_priorities(args.priorities.iter().map(|p| Priority::from(p.as_str())))
        .page(args.limit, args.offset);
    if args.all {
        filter = filter.including_archived();
    }

    let tasks = store.list_tasks(&filter).context("failed to list tasks")?;

    if ctx.json {
        output_json(&tasks);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    let total = store.count_tasks(&filter).context("failed to count tasks")?;
    print_tasks(&tasks);
    if usize::try_from(total).is_ok_and(|t| t > tasks.len()) {
        println!("\nShowing {} of {total} tasks.", tasks.len());
    }
    Ok(())
}

/// Execute the `wl search` command.
pub fn run_search(ctx: &RuntimeContext, store: &SqliteStore, args: &SearchArgs) -> Result<()> {
    let tasks = store
        .search_tasks(&args.query, args.all, args.limit)
        .with_context(|| format!("failed to search for {:?}", args.query))?;

    if ctx.json {
        output_json(&tasks);
    } else if tasks.is_empty() {
        println!("No tasks match {:?}.", args.query);
    } else {
        print_tasks(&tasks);
    }
    Ok(())
}

/// Execute the `wl update` command.
pub fn run_update(ctx: &RuntimeContext, store: &SqliteStore, args: &UpdateArgs) -> Result<()> {
    let mut task = store.get_task(&args.id)?;

    apply_updates(&mut task, args);
    store
        .update_task(&mut task)
        .with_context(|| format!("failed to update {}", task.id))?;

    if ctx.json {
        output_json(&task);
    } else {
        println!("Updated {}", format_task_compact(&task));
    }
    Ok(())
}

/// Execute the `wl delete` command.
pub fn run_delete(ctx: &RuntimeContext, store: &SqliteStore, args: &DeleteArgs) -> Result<()> {
    // Deleting an unknown ID is a no-op in storage; report it here instead.
    let task = store.get_task(&args.id)?;
    store
        .delete_task(&task.id)
        .with_context(|| format!("failed to delete {}", task.id))?;

    if ctx.json {
        output_json(&json!({ "deleted": task.id }));
    } else {
        println!("Deleted {} and its links and comments", task.id);
    }
    Ok(())
}

/// Copies the flags that were given onto `task`. Tag and blocker lists are
/// replaced, not merged.
fn apply_updates(task: &mut Task, args: &UpdateArgs) {
    if let Some(title) = &args.title {
        task.title.clone_from(title);
    }
    if let Some(external_ref) = &args.external_ref {
        task.external_ref.clone_from(external_ref);
    }
    if let Some(priority) = &args.priority {
        task.priority = Priority::from(priority.as_str());
    }
    if let Some(status) = &args.status {
        task.status = TaskStatus::from(status.as_str());
    }
    if !args.tags.is_empty() {
        task.tags.clone_from(&args.tags);
    }
    if !args.blockers.is_empty() {
        task.blockers.clone_from(&args.blockers);
    }
}

fn print_tasks(tasks: &[Task]) {
    let rows: Vec<Vec<String>> = tasks.iter().map(format_task_row).collect();
    output_table(TASK_HEADERS, &rows);
}

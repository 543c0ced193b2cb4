//! `wl comment` -- add, list, edit and remove comments on tasks.

use anyhow::{Context, Result};
use serde_json::json;

use worklog_core::comment::Comment;
use worklog_storage::{Repository, SqliteStore};

use crate::cli::{
    CommentAddArgs, CommentArgs, CommentCommands, CommentEditArgs, CommentListArgs, CommentRmArgs,
};
use crate::context::RuntimeContext;
use crate::output::{format_comment_line, output_json};

/// Dispatch a `wl comment` subcommand.
pub fn run(ctx: &RuntimeContext, store: &SqliteStore, args: &CommentArgs) -> Result<()> {
    match &args.command {
        CommentCommands::Add(a) => run_add(ctx, store, a),
        CommentCommands::List(a) => run_list(ctx, store, a),
        CommentCommands::Edit(a) => run_edit(ctx, store, a),
        CommentCommands::Rm(a) => run_rm(ctx, store, a),
    }
}

fn run_add(ctx: &RuntimeContext, store: &SqliteStore, args: &CommentAddArgs) -> Result<()> {
    let task = store.get_task(&args.task_id)?;

    let mut comment = Comment::new(&task.id, &args.content);
    store
        .create_comment(&mut comment)
        .with_context(|| format!("failed to add comment to {}", task.id))?;

    if ctx.json {
        output_json(&comment);
    } else {
        println!("Added comment {} to {}", comment.id, task.id);
    }
    Ok(())
}

fn run_list(ctx: &RuntimeContext, store: &SqliteStore, args: &CommentListArgs) -> Result<()> {
    let comments = store
        .get_task_comments(&args.task_id)
        .with_context(|| format!("failed to list comments of {}", args.task_id))?;

    if ctx.json {
        output_json(&comments);
    } else if comments.is_empty() {
        println!("No comments on {}.", args.task_id);
    } else {
        for comment in &comments {
            println!("{}", format_comment_line(comment));
        }
    }
    Ok(())
}

fn run_edit(ctx: &RuntimeContext, store: &SqliteStore, args: &CommentEditArgs) -> Result<()> {
    let mut comment = store.get_comment(&args.id)?;
    comment.content.clone_from(&args.content);
    store
        .update_comment(&comment)
        .with_context(|| format!("failed to edit {}", comment.id))?;

    if ctx.json {
        output_json(&comment);
    } else {
        println!("Edited {}", comment.id);
    }
    Ok(())
}

fn run_rm(ctx: &RuntimeContext, store: &SqliteStore, args: &CommentRmArgs) -> Result<()> {
    let comment = store.get_comment(&args.id)?;
    store
        .delete_comment(&comment.id)
        .with_context(|| format!("failed to remove {}", comment.id))?;

    if ctx.json {
        output_json(&json!({ "deleted": comment.id }));
    } else {
        println!("Removed {}", comment.id);
    }
    Ok(())
}

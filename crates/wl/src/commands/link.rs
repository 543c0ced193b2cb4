//! `wl link` -- attach evidence links to tasks.

use anyhow::{Context, Result};
use serde_json::json;

use worklog_core::enums::LinkType;
use worklog_core::link::Link;
use worklog_storage::{Repository, SqliteStore};

use crate::cli::{LinkAddArgs, LinkArgs, LinkCommands, LinkListArgs, LinkRmArgs, LinkUpdateArgs};
use crate::context::RuntimeContext;
use crate::output::{format_link_line, output_json};

/// Dispatch a `wl link` subcommand.
pub fn run(ctx: &RuntimeContext, store: &SqliteStore, args: &LinkArgs) -> Result<()> {
    match &args.command {
        LinkCommands::Add(a) => run_add(ctx, store, a),
        LinkCommands::List(a) => run_list(ctx, store, a),
        LinkCommands::Update(a) => run_update(ctx, store, a),
        LinkCommands::Rm(a) => run_rm(ctx, store, a),
    }
}

fn run_add(ctx: &RuntimeContext, store: &SqliteStore, args: &LinkAddArgs) -> Result<()> {
    let task = store.get_task(&args.task_id)?;

    let link_type = args
        .link_type
        .as_deref()
        .map(LinkType::from)
        .unwrap_or_default();
    let mut link = Link::new(&task.id, link_type, &args.url);
    link.title = args.title.clone().unwrap_or_default();
    link.status = args.status.clone().unwrap_or_default();

    store
        .create_link(&mut link)
        .with_context(|| format!("failed to link {} to {}", args.url, task.id))?;

    if ctx.json {
        output_json(&link);
    } else {
        println!("Linked {}", format_link_line(&link));
    }
    Ok(())
}

fn run_list(ctx: &RuntimeContext, store: &SqliteStore, args: &LinkListArgs) -> Result<()> {
    let links = store
        .get_task_links(&args.task_id)
        .with_context(|| format!("failed to list links of {}", args.task_id))?;

    if ctx.json {
        output_json(&links);
    } else if links.is_empty() {
        println!("No links on {}.", args.task_id);
    } else {
        for link in &links {
            println!("{}", format_link_line(link));
        }
    }
    Ok(())
}

fn run_update(ctx: &RuntimeContext, store: &SqliteStore, args: &LinkUpdateArgs) -> Result<()> {
    let mut link = store.get_link(&args.id)?;

    if let Some(link_type) = args.link_type.as_deref() {
        link.link_type = LinkType::from(link_type);
    }
    if let Some(url) = &args.url {
        link.url.clone_from(url);
    }
    if let Some(title) = &args.title {
        link.title.clone_from(title);
    }
    if let Some(status) = &args.status {
        link.status.clone_from(status);
    }

    store
        .update_link(&mut link)
        .with_context(|| format!("failed to update {}", link.id))?;

    if ctx.json {
        output_json(&link);
    } else {
        println!("Updated {}", format_link_line(&link));
    }
    Ok(())
}

fn run_rm(ctx: &RuntimeContext, store: &SqliteStore, args: &LinkRmArgs) -> Result<()> {
    let link = store.get_link(&args.id)?;
    store
        .delete_link(&link.id)
        .with_context(|| format!("failed to remove {}", link.id))?;

    if ctx.json {
        output_json(&json!({ "deleted": link.id }));
    } else {
        println!("Removed {}", link.id);
    }
    Ok(())
}

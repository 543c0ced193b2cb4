//! `wl` -- a work log of tasks with their links and comments.
//!
//! Parses CLI arguments with clap, resolves the runtime context (config and
//! database path), installs logging, and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use worklog_storage::{Repository, SqliteStore};

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();
    let json = cli.global.json;

    // Handle errors: print message and exit with code 1
    if let Err(e) = run(cli) {
        if json {
            let err_json = serde_json::json!({
                "error": format!("{e:#}"),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{s}");
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = RuntimeContext::from_global_args(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(ctx.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        // No subcommand -- print help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        return Ok(());
    };

    let store = ctx.open_store()?;
    let outcome = dispatch(&ctx, &store, command);
    // Close even when the command failed; its error takes precedence.
    let closed = store.close().context("failed to close database");
    outcome.and(closed)
}

fn dispatch(ctx: &RuntimeContext, store: &SqliteStore, command: Commands) -> Result<()> {
    match command {
        Commands::Migrate => commands::migrate::run(ctx, store),
        Commands::Create(args) => commands::task::run_create(ctx, store, &args),
        Commands::Show(args) => commands::task::run_show(ctx, store, &args),
        Commands::List(args) => commands::task::run_list(ctx, store, &args),
        Commands::Search(args) => commands::task::run_search(ctx, store, &args),
        Commands::Update(args) => commands::task::run_update(ctx, store, &args),
        Commands::Delete(args) => commands::task::run_delete(ctx, store, &args),
        Commands::Link(args) => commands::link::run(ctx, store, &args),
        Commands::Comment(args) => commands::comment::run(ctx, store, &args),
    }
}

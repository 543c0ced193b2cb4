//! Clap CLI definitions for the `wl` command.

use clap::{Args, Parser, Subcommand};

/// wl -- a small work log of tasks, links and comments.
#[derive(Parser, Debug)]
#[command(
    name = "wl",
    about = "Track tasks with their links and comments",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Database path (default: database.path from the config, then worklog.db).
    #[arg(long, global = true, env = "WORKLOG_DB")]
    pub db: Option<String>,

    /// Config file path (default: worklog.yaml).
    #[arg(long, global = true, env = "WORKLOG_CONFIG")]
    pub config: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bring the database schema up to date and list applied migrations.
    Migrate,

    /// Create a new task.
    #[command(alias = "new")]
    Create(CreateArgs),

    /// Show a task with its links and comments.
    #[command(alias = "view")]
    Show(ShowArgs),

    /// List tasks.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search titles, external references and tags.
    Search(SearchArgs),

    /// Update task fields.
    Update(UpdateArgs),

    /// Delete a task together with its links and comments.
    Delete(DeleteArgs),

    /// Manage links attached to a task.
    Link(LinkArgs),

    /// Manage comments on a task.
    Comment(CommentArgs),
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Task title.
    pub title: String,

    /// External ticket reference (default: NO-JIRA).
    #[arg(long = "ref")]
    pub external_ref: Option<String>,

    /// Priority: minor, normal, high, critical.
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Status: new, in_progress, blocked, done, archived.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Tag (repeatable).
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// ID of a blocking task (repeatable).
    #[arg(short, long = "blocker")]
    pub blockers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task ID.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only tasks with this status (repeatable).
    #[arg(short, long = "status")]
    pub statuses: Vec<String>,

    /// Only tasks with this priority (repeatable).
    #[arg(short, long = "priority")]
    pub priorities: Vec<String>,

    /// Include archived tasks.
    #[arg(short, long)]
    pub all: bool,

    /// Maximum number of tasks to show.
    #[arg(short = 'n', long, default_value_t = 0)]
    pub limit: i64,

    /// Number of tasks to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive substring).
    pub query: String,

    /// Include archived tasks.
    #[arg(short, long)]
    pub all: bool,

    /// Maximum number of results.
    #[arg(short = 'n', long, default_value_t = 0)]
    pub limit: i64,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task ID.
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long = "ref")]
    pub external_ref: Option<String>,

    #[arg(short, long)]
    pub priority: Option<String>,

    #[arg(short, long)]
    pub status: Option<String>,

    /// Replace the tag list (repeatable).
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Replace the blocker list (repeatable).
    #[arg(short, long = "blocker")]
    pub blockers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Task ID.
    pub id: String,
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkCommands,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Attach a link to a task.
    Add(LinkAddArgs),

    /// List a task's links, oldest first.
    List(LinkListArgs),

    /// Change a link.
    Update(LinkUpdateArgs),

    /// Remove a link.
    #[command(alias = "remove")]
    Rm(LinkRmArgs),
}

#[derive(Args, Debug)]
pub struct LinkAddArgs {
    /// Task ID.
    pub task_id: String,

    pub url: String,

    /// Link type: pull_request, slack_thread, jira_ticket, documentation, other.
    #[arg(short = 't', long = "type")]
    pub link_type: Option<String>,

    /// Display title (default: the URL).
    #[arg(long)]
    pub title: Option<String>,

    /// Free-form status, e.g. "merged".
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct LinkListArgs {
    /// Task ID.
    pub task_id: String,
}

#[derive(Args, Debug)]
pub struct LinkUpdateArgs {
    /// Link ID.
    pub id: String,

    #[arg(short = 't', long = "type")]
    pub link_type: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct LinkRmArgs {
    /// Link ID.
    pub id: String,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub command: CommentCommands,
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Add a comment to a task.
    Add(CommentAddArgs),

    /// List a task's comments in chronological order.
    List(CommentListArgs),

    /// Replace a comment's content.
    Edit(CommentEditArgs),

    /// Remove a comment.
    #[command(alias = "remove")]
    Rm(CommentRmArgs),
}

#[derive(Args, Debug)]
pub struct CommentAddArgs {
    /// Task ID.
    pub task_id: String,

    pub content: String,
}

#[derive(Args, Debug)]
pub struct CommentListArgs {
    /// Task ID.
    pub task_id: String,
}

#[derive(Args, Debug)]
pub struct CommentEditArgs {
    /// Comment ID.
    pub id: String,

    pub content: String,
}

#[derive(Args, Debug)]
pub struct CommentRmArgs {
    /// Comment ID.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeatable_tags_collect_in_order() {
        let cli = Cli::parse_from(["wl", "create", "Title", "-t", "b", "--tag", "a"]);
        match cli.command {
            Some(Commands::Create(args)) => assert_eq!(args.tags, vec!["b", "a"]),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["wl", "list", "--json", "--db", "x.db", "--all"]);
        assert!(cli.global.json);
        assert_eq!(cli.global.db.as_deref(), Some("x.db"));
    }
}

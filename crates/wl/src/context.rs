//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the loaded
//! configuration, the resolved database path and the global output flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use worklog_config::{WorklogConfig, load_config};
use worklog_storage::SqliteStore;

use crate::cli::GlobalArgs;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "worklog.yaml";

/// Filter installed by `--verbose`.
const VERBOSE_FILTER: &str = "wl=debug,worklog_storage=debug";

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    pub config: WorklogConfig,

    /// Database file, after applying `--db` over the config.
    pub db_path: PathBuf,

    /// Whether to produce JSON output.
    pub json: bool,

    pub verbose: bool,
}

impl RuntimeContext {
    /// Builds a `RuntimeContext` from parsed global arguments, loading the
    /// config file.
    ///
    /// Database path priority: `--db` flag > `database.path` in the config >
    /// `worklog.db`.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = global.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
        let config = load_config(Path::new(config_path))
            .with_context(|| format!("failed to load config from {config_path}"))?;

        let db_path = match global.db.as_deref() {
            Some(db) if !db.is_empty() => PathBuf::from(db),
            _ => config.database.path.clone(),
        };

        Ok(Self {
            config,
            db_path,
            json: global.json,
            verbose: global.verbose,
        })
    }

    /// The `tracing` filter for this run: `--verbose`, then `RUST_LOG`, then
    /// the config's `log.filter`.
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new(VERBOSE_FILTER);
        }
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.log.filter))
    }

    /// Opens the store, migrating the schema if needed.
    pub fn open_store(&self) -> Result<SqliteStore> {
        debug!(path = %self.db_path.display(), "opening store");
        SqliteStore::open_with_options(&self.db_path, &self.config.connection_options())
            .with_context(|| format!("failed to open database {}", self.db_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(db: Option<&str>, config: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            db: db.map(String::from),
            config: config.map(String::from),
            json: false,
            verbose: false,
        }
    }

    #[test]
    fn db_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("worklog.yaml");
        std::fs::write(&config, "database:\n  path: from-config.db\n").unwrap();
        let config = config.to_str().unwrap();

        let ctx = RuntimeContext::from_global_args(&args(None, Some(config))).unwrap();
        assert_eq!(ctx.db_path, PathBuf::from("from-config.db"));

        let ctx = RuntimeContext::from_global_args(&args(Some("flag.db"), Some(config))).unwrap();
        assert_eq!(ctx.db_path, PathBuf::from("flag.db"));
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let ctx = RuntimeContext::from_global_args(&args(None, missing.to_str())).unwrap();
        assert_eq!(ctx.db_path, PathBuf::from("worklog.db"));
        assert_eq!(ctx.config, WorklogConfig::default());
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("worklog.yaml");
        std::fs::write(&config, "database: [").unwrap();
        let err = RuntimeContext::from_global_args(&args(None, config.to_str())).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load config"));
    }
}

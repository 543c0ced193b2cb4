//! Configuration types and loading.
//!
//! The main entry point is [`WorklogConfig`], the contents of the YAML config
//! file. It is loaded with [`load_config`] and saved with [`save_config`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use worklog_storage::sqlite::{ConnectionOptions, DEFAULT_BUSY_TIMEOUT_MS};

/// Database file used when neither the command line nor the config names one.
pub const DEFAULT_DB_PATH: &str = "worklog.db";

/// Log filter used when the config does not set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Database configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Milliseconds a statement waits on a locked database.
    #[serde(default = "default_busy_timeout_ms", rename = "busy-timeout-ms")]
    pub busy_timeout_ms: u64,

    /// Use write-ahead logging.
    #[serde(default = "default_true")]
    pub wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            wal: true,
        }
    }
}

impl From<&DatabaseConfig> for ConnectionOptions {
    fn from(db: &DatabaseConfig) -> Self {
        ConnectionOptions {
            busy_timeout_ms: db.busy_timeout_ms,
            wal: db.wal,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"worklog_storage=debug"`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full worklog configuration.
///
/// All fields use `serde` defaults so a partially specified file yields
/// sensible values for everything it leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorklogConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl WorklogConfig {
    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "log.filter".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Connection options for the configured database.
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions::from(&self.database)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Loads configuration from `path`.
///
/// A missing or empty file yields the default [`WorklogConfig`].
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// [`ConfigError::ParseError`] if it contains invalid YAML, or
/// [`ConfigError::InvalidValue`] if a value is unusable.
pub fn load_config(path: &Path) -> Result<WorklogConfig> {
    if !path.exists() {
        return Ok(WorklogConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(WorklogConfig::default());
    }

    let config: WorklogConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Saves configuration to `path`, creating parent directories as needed.
pub fn save_config(path: &Path, config: &WorklogConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let cfg = WorklogConfig::default();
        assert_eq!(cfg.database.path, PathBuf::from("worklog.db"));
        assert_eq!(cfg.database.busy_timeout_ms, 5000);
        assert!(cfg.database.wal);
        assert_eq!(cfg.log.filter, "warn");
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_file_returns_default() {
        let cfg = load_config(Path::new("/nonexistent/path/worklog.yaml")).unwrap();
        assert_eq!(cfg, WorklogConfig::default());
    }

    #[test]
    fn empty_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.yaml");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(load_config(&path).unwrap(), WorklogConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "database:\n  path: /tmp/tasks.db\n";
        let cfg: WorklogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/tasks.db"));
        assert_eq!(cfg.database.busy_timeout_ms, 5000);
        assert!(cfg.database.wal);
        assert_eq!(cfg.log, LogConfig::default());
    }

    #[test]
    fn roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("worklog.yaml");

        let mut cfg = WorklogConfig::default();
        cfg.database.busy_timeout_ms = 250;
        cfg.database.wal = false;
        cfg.log.filter = "worklog_storage=debug".into();

        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.yaml");
        std::fs::write(&path, "database: [unclosed").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn empty_filter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.yaml");
        std::fs::write(&path, "log:\n  filter: \"\"\n").unwrap();
        match load_config(&path) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "log.filter"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn converts_to_connection_options() {
        let mut cfg = WorklogConfig::default();
        cfg.database.busy_timeout_ms = 42;
        cfg.database.wal = false;
        assert_eq!(
            cfg.connection_options(),
            ConnectionOptions { busy_timeout_ms: 42, wal: false }
        );
    }
}

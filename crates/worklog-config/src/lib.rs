//! Configuration management for worklog.
//!
//! Handles loading and saving the YAML configuration file and converting its
//! database section into storage connection options.

pub mod config;

pub use config::{
    ConfigError, DEFAULT_DB_PATH, DatabaseConfig, LogConfig, WorklogConfig, load_config,
    save_config,
};

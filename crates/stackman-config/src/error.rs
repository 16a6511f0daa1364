//! Error types for configuration and stack environment

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config at {path}: {source}")]
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to determine config directory")]
    NoConfigDir,

    #[error("Failed to write config file at {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("STACK_FILE not set and cannot be detected - please set STACK_FILE environment variable or run from stack directory")]
    StackFileUnset,

    #[error("docker-compose file not found at {} - please verify STACK_FILE path", .0.display())]
    StackFileMissing(PathBuf),

    #[error("STACK_FILE points to a directory, not a file: {}", .0.display())]
    StackFileIsDirectory(PathBuf),

    #[error("docker-compose file at {} is not readable: {source}", .path.display())]
    StackFileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

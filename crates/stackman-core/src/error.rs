//! Error types for stackman-core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] stackman_config::ConfigError),

    #[error("{0}")]
    Provider(#[from] stackman_provider::ProviderError),

    #[error("Not connected to Docker: {0}")]
    NotConnected(String),

    #[error("template not found: checked STACK_HOME and executable-relative paths")]
    TemplateNotFound,

    #[error("Failed to copy template to {}: {source}", .path.display())]
    TemplateCopy {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to detect project: {0}")]
    ProjectDetection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

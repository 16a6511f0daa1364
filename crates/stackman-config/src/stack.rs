//! Stack environment detection
//!
//! The compose file is located through `STACK_FILE`, then `STACK_HOME`,
//! then the directory holding the running executable.

use crate::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Default compose file name looked up in `STACK_HOME` and next to the binary
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Location of the shared compose stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackEnv {
    /// Resolved compose file, if any source produced one
    pub stack_file: Option<PathBuf>,
    /// Root of the stack checkout (`STACK_HOME`)
    pub stack_home: Option<PathBuf>,
}

impl StackEnv {
    /// Detect the stack from the process environment
    pub fn detect() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        Self::detect_from(
            std::env::var("STACK_FILE").ok(),
            std::env::var("STACK_HOME").ok(),
            exe_dir,
        )
    }

    /// Detect the stack from explicit inputs
    pub fn detect_from(
        stack_file: Option<String>,
        stack_home: Option<String>,
        exe_dir: Option<PathBuf>,
    ) -> Self {
        let stack_home = stack_home
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let stack_file = match stack_file.filter(|s| !s.trim().is_empty()) {
            Some(file) => Some(PathBuf::from(file)),
            None => match &stack_home {
                Some(home) => Some(home.join(COMPOSE_FILE_NAME)),
                None => exe_dir.map(|dir| dir.join(COMPOSE_FILE_NAME)),
            },
        };

        tracing::debug!("Detected stack file {:?} (home {:?})", stack_file, stack_home);

        Self {
            stack_file,
            stack_home,
        }
    }

    /// Use an explicit compose file, keeping the detected home
    pub fn with_stack_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stack_file = Some(path.into());
        self
    }

    /// Check that the compose file exists, is a regular file, and can be read
    pub fn validate(&self) -> Result<&Path> {
        let path = self
            .stack_file
            .as_deref()
            .ok_or(ConfigError::StackFileUnset)?;
        validate_stack_file(path)?;
        Ok(path)
    }
}

/// Validate a compose file path without touching the environment
pub fn validate_stack_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::StackFileUnset);
    }

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::StackFileMissing(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::StackFileUnreadable {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if metadata.is_dir() {
        return Err(ConfigError::StackFileIsDirectory(path.to_path_buf()));
    }

    std::fs::File::open(path).map_err(|e| ConfigError::StackFileUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

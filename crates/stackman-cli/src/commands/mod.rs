//! CLI command implementations

mod inspect;
mod stack;

use anyhow::{anyhow, Result};
use stackman_core::{format_user_error, CoreError, Project, StackManager};
use std::path::Path;

pub use inspect::*;
pub use stack::*;

/// Detect the project rooted at `dir`
fn find_project(manager: &StackManager, dir: &Path) -> Result<Project> {
    Ok(manager.detect_project(dir)?)
}

/// Turn a runtime failure into the sentence the dashboard would show
fn user_error(e: CoreError) -> anyhow::Error {
    match e {
        CoreError::Config(e) => anyhow!(e),
        other => anyhow!(format_user_error(&other.to_string())),
    }
}

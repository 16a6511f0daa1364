//! Project detection and compose project naming

use crate::{CoreError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Directory a project must contain before the stack can serve it
pub const PUBLIC_HTML_DIR: &str = "public_html";

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("invalid-chars pattern is valid"));

static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]+").expect("hyphen-runs pattern is valid"));

static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-?(.*)$").expect("leading-digits pattern is valid"));

/// A website project the stack serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Sanitized name, used as `COMPOSE_PROJECT_NAME`
    pub name: String,
    /// Project root (`CODE_DIR`)
    pub path: PathBuf,
    /// Whether `public_html/` exists
    pub has_public_html: bool,
}

impl Project {
    /// Detect the project rooted at `path`
    pub fn detect(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(CoreError::ProjectDetection(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let raw_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let project = Self {
            name: sanitize_project_name(&raw_name),
            path: path.to_path_buf(),
            has_public_html: path.join(PUBLIC_HTML_DIR).is_dir(),
        };

        tracing::debug!(
            "Detected project {} at {:?} (public_html: {})",
            project.name,
            project.path,
            project.has_public_html
        );

        Ok(project)
    }

    pub fn public_html(&self) -> PathBuf {
        self.path.join(PUBLIC_HTML_DIR)
    }
}

/// Turn a directory name into a valid compose project name
///
/// Lowercases, replaces runs of anything outside `[a-z0-9]` with a single
/// hyphen, moves leading digits to the end (`123-test` becomes `test-123`),
/// prefixes digit-only names with `p`, and falls back to `project`.
pub fn sanitize_project_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let replaced = INVALID_CHARS.replace_all(&lower, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&replaced, "-");
    let mut name = collapsed.trim_matches('-').to_string();

    if let Some(caps) = LEADING_DIGITS.captures(&name) {
        let digits = caps.get(1).map_or("", |m| m.as_str());
        let rest = caps.get(2).map_or("", |m| m.as_str());
        name = if rest.is_empty() {
            format!("p{}", digits)
        } else {
            format!("{}-{}", rest, digits)
        };
    }

    let name = name.trim_start_matches('-');
    if name.is_empty() {
        "project".to_string()
    } else {
        name.to_string()
    }
}

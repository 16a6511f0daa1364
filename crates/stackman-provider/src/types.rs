//! Common types shared by the runtime client and the compose runner

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Container ID wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        if self.0.len() > 12 {
            &self.0[..12]
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Container status as shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Stopped,
    Restarting,
    Error,
    Unknown,
}

impl ContainerStatus {
    /// Map a docker state string (`running`, `exited`, ...) onto the dashboard status
    pub fn from_state(state: Option<&str>) -> Self {
        match state.map(str::to_lowercase).as_deref() {
            None | Some("") => Self::Unknown,
            Some("running") => Self::Running,
            Some("restarting") => Self::Restarting,
            Some("exited") | Some("created") | Some("paused") | Some("dead") => Self::Stopped,
            Some(_) => Self::Error,
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Restarting => write!(f, "Restarting"),
            Self::Error => write!(f, "Error"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Point-in-time view of one container in the stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub id: ContainerId,
    /// Compose service name (falls back to the container name, then the id)
    pub service: String,
    /// Container name without the leading slash
    pub name: String,
    pub image: String,
    pub status: ContainerStatus,
    /// Access URL; empty when the service has none, `internal` when proxied
    pub url: String,
    /// Last sampled CPU usage, 0 when not sampled
    pub cpu_percent: f64,
}

impl ContainerSnapshot {
    pub fn is_running(&self) -> bool {
        self.status == ContainerStatus::Running
    }
}

/// Single-container lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

impl ContainerAction {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Status-line form: "Starting", "Stopping", "Restarting"
    pub fn progressive(&self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Restart => "Restarting",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
        }
    }
}

/// Whole-stack compose operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeOperation {
    Up,
    Down,
    Restart,
    /// `down -v`: removes containers and named volumes
    Destroy,
}

impl ComposeOperation {
    /// Arguments following `docker compose -f <file>`
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            Self::Up => &["up", "-d"],
            Self::Down => &["down"],
            Self::Restart => &["restart"],
            Self::Destroy => &["down", "-v"],
        }
    }

    /// Progress label shown while the operation runs
    pub fn progress_label(&self) -> &'static str {
        match self {
            Self::Up => "Starting stack...",
            Self::Down => "Stopping stack...",
            Self::Restart => "Restarting stack...",
            Self::Destroy => "Destroying stack...",
        }
    }
}

impl std::fmt::Display for ComposeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Restart => write!(f, "restart"),
            Self::Destroy => write!(f, "destroy"),
        }
    }
}

/// Everything a compose invocation needs to know about the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeTarget {
    pub stack_file: PathBuf,
    /// Exported as `CODE_DIR`
    pub code_dir: PathBuf,
    /// Exported as `COMPOSE_PROJECT_NAME`
    pub project_name: String,
}

/// Result of a synchronous compose run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposeOutput {
    pub success: bool,
    /// stdout followed by stderr
    pub combined_output: String,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_state() {
        assert_eq!(ContainerStatus::from_state(Some("running")), ContainerStatus::Running);
        assert_eq!(ContainerStatus::from_state(Some("Restarting")), ContainerStatus::Restarting);
        for state in ["exited", "created", "paused", "dead"] {
            assert_eq!(ContainerStatus::from_state(Some(state)), ContainerStatus::Stopped);
        }
        assert_eq!(ContainerStatus::from_state(Some("removing")), ContainerStatus::Error);
        assert_eq!(ContainerStatus::from_state(None), ContainerStatus::Unknown);
    }

    #[test]
    fn test_compose_args() {
        assert_eq!(ComposeOperation::Up.args(), &["up", "-d"]);
        assert_eq!(ComposeOperation::Destroy.args(), &["down", "-v"]);
    }

    #[test]
    fn test_container_id_short() {
        let id = ContainerId::new("0123456789abcdef");
        assert_eq!(id.short(), "0123456789ab");
        assert_eq!(ContainerId::new("abc").short(), "abc");
    }

    #[test]
    fn test_snapshot_serializes_status_lowercase() {
        let snapshot = ContainerSnapshot {
            id: ContainerId::new("abc"),
            service: "nginx".into(),
            name: "site-nginx-1".into(),
            image: "nginx:alpine".into(),
            status: ContainerStatus::Running,
            url: "http://localhost:80".into(),
            cpu_percent: 1.5,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"status\":\"running\""));
    }
}

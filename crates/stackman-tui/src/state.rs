//! Dashboard state owned by the reducer

use crate::confirm::ConfirmationFlow;
use chrono::{DateTime, Local};
use stackman_config::StackEnv;
use stackman_core::Project;
use stackman_provider::{ComposeOperation, ContainerSnapshot, OutputLine};

/// Which dashboard panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    /// No containers yet: setup hints and stack start
    #[default]
    Preflight,
    /// Compose output of the current or last stack operation
    Output,
    /// Container table
    Status,
}

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Help,
    Projects,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub view: View,
    pub panel: Panel,
    pub project: Option<Project>,
    pub stack: StackEnv,
    pub containers: Vec<ContainerSnapshot>,
    pub selected: usize,
    pub output: Vec<OutputLine>,
    pub streaming: bool,
    /// Stack operation whose output is in `output`
    pub operation: Option<ComposeOperation>,
    pub confirmation: ConfirmationFlow,
    pub status_message: Option<String>,
    pub last_error: Option<String>,
    pub refresh_active: bool,
    pub last_refreshed: Option<DateTime<Local>>,
    /// Set when the dashboard started without a Docker connection
    pub connection_error: Option<String>,
    pub(crate) stream_id: u64,
    pub(crate) poll_generation: u64,
    pub(crate) error_generation: u64,
}

impl DashboardState {
    pub fn new(stack: StackEnv) -> Self {
        Self {
            stack,
            ..Self::default()
        }
    }

    /// Id of the most recent stack operation
    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }

    /// Generation of the active poll loop
    pub fn poll_generation(&self) -> u64 {
        self.poll_generation
    }

    pub fn error_generation(&self) -> u64 {
        self.error_generation
    }

    pub fn selected_container(&self) -> Option<&ContainerSnapshot> {
        self.containers.get(self.selected)
    }

    /// Project ready for stack operations (detected and scaffolded)
    pub fn scaffolded_project(&self) -> Option<&Project> {
        self.project.as_ref().filter(|p| p.has_public_html)
    }

    pub fn select_next(&mut self) {
        if !self.containers.is_empty() {
            self.selected = (self.selected + 1) % self.containers.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.containers.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.containers.len() - 1);
        }
    }

    /// Replace the container list and move between Preflight and Status
    pub fn apply_containers(&mut self, containers: Vec<ContainerSnapshot>) {
        self.containers = containers;
        self.selected = self.selected.min(self.containers.len().saturating_sub(1));
        self.last_refreshed = Some(Local::now());

        match self.panel {
            Panel::Output => {}
            Panel::Preflight if !self.containers.is_empty() => self.panel = Panel::Status,
            Panel::Status if self.containers.is_empty() => self.panel = Panel::Preflight,
            _ => {}
        }
    }
}

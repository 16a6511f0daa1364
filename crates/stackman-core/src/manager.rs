//! Stack manager - coordinates runtime, compose runner and stack environment

use crate::{find_template_source, install_template, CoreError, Project, Result};
use stackman_config::{GlobalConfig, StackEnv};
use stackman_provider::{
    ComposeOperation, ComposeOutput, ComposeRunner, ComposeTarget, ContainerId, ContainerRuntime,
    ContainerSnapshot, OutputLine,
};
use std::path::Path;
use tokio::sync::mpsc;

/// Main stack manager
pub struct StackManager {
    /// Container runtime (None when the daemon could not be reached)
    runtime: Option<Box<dyn ContainerRuntime>>,
    /// Compose process runner
    runner: Box<dyn ComposeRunner>,
    /// Where the compose file lives
    stack: StackEnv,
    /// Global configuration
    config: GlobalConfig,
    /// Error message when disconnected
    connection_error: Option<String>,
}

impl StackManager {
    /// Create a connected manager
    pub fn new(
        runtime: Box<dyn ContainerRuntime>,
        runner: Box<dyn ComposeRunner>,
        stack: StackEnv,
        config: GlobalConfig,
    ) -> Self {
        Self {
            runtime: Some(runtime),
            runner,
            stack,
            config,
            connection_error: None,
        }
    }

    /// Create a manager without a runtime
    ///
    /// Compose operations still work; container queries fail with the
    /// recorded connection error.
    pub fn disconnected(
        runner: Box<dyn ComposeRunner>,
        stack: StackEnv,
        config: GlobalConfig,
        error: String,
    ) -> Self {
        tracing::warn!("Starting without a Docker connection: {}", error);
        Self {
            runtime: None,
            runner,
            stack,
            config,
            connection_error: Some(error),
        }
    }

    /// Create a manager for compose commands only; no daemon connection is attempted
    pub fn compose_only(runner: Box<dyn ComposeRunner>, stack: StackEnv, config: GlobalConfig) -> Self {
        Self {
            runtime: None,
            runner,
            stack,
            config,
            connection_error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn connection_error(&self) -> Option<&str> {
        self.connection_error.as_deref()
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn stack(&self) -> &StackEnv {
        &self.stack
    }

    fn require_runtime(&self) -> Result<&dyn ContainerRuntime> {
        self.runtime.as_deref().ok_or_else(|| {
            CoreError::NotConnected(
                self.connection_error
                    .clone()
                    .unwrap_or_else(|| "no container runtime".to_string()),
            )
        })
    }

    /// Detect the project at `path`
    pub fn detect_project(&self, path: &Path) -> Result<Project> {
        Project::detect(path)
    }

    /// Compose invocation target for a project
    pub fn target_for(&self, project: &Project) -> Result<ComposeTarget> {
        let stack_file = self.stack.validate()?.to_path_buf();
        Ok(ComposeTarget {
            stack_file,
            code_dir: project.path.clone(),
            project_name: project.name.clone(),
        })
    }

    /// Containers of a project
    pub async fn list(&self, project: &Project) -> Result<Vec<ContainerSnapshot>> {
        Ok(self.require_runtime()?.list(&project.name).await?)
    }

    /// Containers of a project with CPU usage sampled
    pub async fn list_with_stats(&self, project: &Project) -> Result<Vec<ContainerSnapshot>> {
        Ok(self.require_runtime()?.list_with_stats(&project.name).await?)
    }

    pub async fn start(&self, id: &ContainerId) -> Result<()> {
        tracing::debug!("Starting container {}", id.short());
        Ok(self.require_runtime()?.start(id).await?)
    }

    pub async fn stop(&self, id: &ContainerId) -> Result<()> {
        tracing::debug!("Stopping container {}", id.short());
        let timeout = self.config.runtime.effective_stop_timeout();
        Ok(self.require_runtime()?.stop(id, timeout).await?)
    }

    pub async fn restart(&self, id: &ContainerId) -> Result<()> {
        tracing::debug!("Restarting container {}", id.short());
        let timeout = self.config.runtime.effective_stop_timeout();
        Ok(self.require_runtime()?.restart(id, timeout).await?)
    }

    /// Run a compose operation to completion
    pub async fn run(&self, operation: ComposeOperation, project: &Project) -> Result<ComposeOutput> {
        let target = self.target_for(project)?;
        Ok(self.runner.run(operation, &target).await?)
    }

    /// Start a streaming compose operation
    ///
    /// Validation errors come back immediately and no channel is created.
    pub fn stream(
        &self,
        operation: ComposeOperation,
        project: &Project,
    ) -> Result<mpsc::Receiver<OutputLine>> {
        let target = self.target_for(project)?;
        Ok(self.runner.stream(operation, &target)?)
    }

    /// Copy the starter template into the project, returning the file count
    pub fn install_template(&self, project: &Project) -> Result<usize> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let source = find_template_source(self.stack.stack_home.as_deref(), exe_dir.as_deref())?;
        install_template(project, &source)
    }
}

//! Container runtime client and compose runner for stackman
//!
//! This crate provides the two collaborators the dashboard drives:
//! - [`ContainerRuntime`]: list and control individual containers (bollard)
//! - [`ComposeRunner`]: run whole-stack `docker compose` operations, either
//!   synchronously or as a stream of [`OutputLine`]s

mod compose;
mod docker;
mod error;
mod metrics;
mod output;
mod types;

pub use compose::{compose_env, phpmyadmin_image, ComposeCli, STREAM_BUFFER};
pub use docker::DockerRuntime;
pub use error::*;
pub use metrics::*;
pub use output::*;
pub use types::*;

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Label docker compose stamps on every container of a project
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Label docker compose stamps with the service name
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";

/// Trait for container runtimes
///
/// Every call carries its own timeout and reports failures through the
/// closed [`ProviderError`] taxonomy.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List all containers (running or not) of a compose project
    async fn list(&self, project: &str) -> Result<Vec<ContainerSnapshot>>;

    /// Same as [`list`](Self::list) with CPU usage sampled for running containers
    async fn list_with_stats(&self, project: &str) -> Result<Vec<ContainerSnapshot>>;

    /// Start a container
    async fn start(&self, id: &ContainerId) -> Result<()>;

    /// Stop a container, giving it `timeout_secs` to exit
    async fn stop(&self, id: &ContainerId, timeout_secs: i64) -> Result<()>;

    /// Restart a container, giving it `timeout_secs` to exit
    async fn restart(&self, id: &ContainerId, timeout_secs: i64) -> Result<()>;

    /// Check if the daemon is reachable
    async fn ping(&self) -> Result<()>;
}

/// Trait for whole-stack compose operations
#[async_trait]
pub trait ComposeRunner: Send + Sync {
    /// Run an operation to completion, capturing stdout and stderr
    async fn run(&self, operation: ComposeOperation, target: &ComposeTarget)
        -> Result<ComposeOutput>;

    /// Start an operation and stream its output
    ///
    /// The stack file is validated before anything is spawned; a validation
    /// failure returns `Err` and no channel exists. Once a channel is returned
    /// it always closes after the operation ends.
    fn stream(
        &self,
        operation: ComposeOperation,
        target: &ComposeTarget,
    ) -> Result<mpsc::Receiver<OutputLine>>;
}

/// Create the default Docker runtime from global config
pub async fn create_default_runtime(
    config: &stackman_config::GlobalConfig,
) -> Result<Box<dyn ContainerRuntime>> {
    let runtime = DockerRuntime::new(&config.docker.socket, config.runtime.clone()).await?;
    tracing::info!("Connected to Docker at {}", config.docker.socket);
    Ok(Box::new(runtime))
}

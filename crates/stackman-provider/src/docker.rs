//! Docker runtime implementation using bollard

use crate::{
    cpu_percent, service_private_port, url_for_service_with_port, ContainerId, ContainerRuntime,
    ContainerSnapshot, ContainerStatus, CpuUsage, ProviderError, Result, COMPOSE_PROJECT_LABEL,
    COMPOSE_SERVICE_LABEL,
};
use async_trait::async_trait;
use bollard::container::{
    ListContainersOptions, RestartContainerOptions, StartContainerOptions, Stats, StatsOptions,
    StopContainerOptions,
};
use bollard::service::ContainerSummary;
use bollard::Docker;
use futures::StreamExt;
use stackman_config::{normalize_stop_timeout, RuntimeConfig};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Timeout for the initial ping
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Docker runtime using the bollard crate
pub struct DockerRuntime {
    client: Docker,
    limits: RuntimeConfig,
}

impl DockerRuntime {
    /// Connect to the daemon and verify it answers
    pub async fn new(socket_path: &str, limits: RuntimeConfig) -> Result<Self> {
        let client = if socket_path.starts_with("http://") || socket_path.starts_with("tcp://") {
            Docker::connect_with_http(socket_path, 120, bollard::API_DEFAULT_VERSION)
        } else {
            let path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(path, 120, bollard::API_DEFAULT_VERSION)
        }
        .map_err(|e| ProviderError::DaemonUnreachable(e.to_string()))?;

        let runtime = Self { client, limits };
        runtime
            .call(CONNECT_TIMEOUT_SECS, runtime.client.ping())
            .await
            .map_err(|e| match e {
                ProviderError::Unknown(detail) => ProviderError::DaemonUnreachable(detail),
                other => other,
            })?;

        Ok(runtime)
    }

    /// Get the underlying Docker client
    pub fn client(&self) -> &Docker {
        &self.client
    }

    /// Run a bollard call under a timeout, mapping both failure kinds
    async fn call<T, F>(&self, secs: u64, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, bollard::errors::Error>>,
    {
        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(result) => result.map_err(ProviderError::from),
            Err(_) => Err(ProviderError::Timeout),
        }
    }

    async fn sample_cpu(&self, id: &str) -> Result<f64> {
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };
        let mut stream = self.client.stats(id, Some(options));
        let next = tokio::time::timeout(
            Duration::from_secs(self.limits.stats_timeout_secs),
            stream.next(),
        )
        .await
        .map_err(|_| ProviderError::Timeout)?;

        match next {
            Some(stats) => Ok(cpu_from_stats(&stats?)),
            None => Err(ProviderError::Unknown(format!("no stats returned for {}", id))),
        }
    }
}

/// CPU percentage from a bollard stats sample
fn cpu_from_stats(stats: &Stats) -> f64 {
    let previous = CpuUsage {
        total: stats.precpu_stats.cpu_usage.total_usage,
        system: stats.precpu_stats.system_cpu_usage.unwrap_or(0),
    };
    let current = CpuUsage {
        total: stats.cpu_stats.cpu_usage.total_usage,
        system: stats.cpu_stats.system_cpu_usage.unwrap_or(0),
    };
    let num_cpus = stats
        .cpu_stats
        .cpu_usage
        .percpu_usage
        .as_ref()
        .map(Vec::len)
        .unwrap_or(0);

    cpu_percent(previous, current, num_cpus)
}

/// Build a snapshot from a container list entry
fn snapshot_from_summary(summary: ContainerSummary) -> ContainerSnapshot {
    let id = summary.id.unwrap_or_default();
    let name = summary
        .names
        .as_ref()
        .and_then(|names| {
            names
                .iter()
                .map(|n| n.trim_start_matches('/'))
                .find(|n| !n.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let service = summary
        .labels
        .as_ref()
        .and_then(|labels| labels.get(COMPOSE_SERVICE_LABEL))
        .filter(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| if name.is_empty() { id.clone() } else { name.clone() });

    let published = service_private_port(&service).and_then(|private| {
        summary.ports.as_ref().and_then(|ports| {
            ports
                .iter()
                .find(|p| p.private_port == private && p.public_port.is_some())
                .and_then(|p| p.public_port)
        })
    });

    ContainerSnapshot {
        id: ContainerId::new(id),
        url: url_for_service_with_port(&service, published),
        service,
        name,
        image: summary.image.unwrap_or_default(),
        status: ContainerStatus::from_state(summary.state.as_deref()),
        cpu_percent: 0.0,
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list(&self, project: &str) -> Result<Vec<ContainerSnapshot>> {
        let mut filters = HashMap::new();
        if !project.trim().is_empty() {
            filters.insert(
                "label".to_string(),
                vec![format!("{}={}", COMPOSE_PROJECT_LABEL, project)],
            );
        }
        let options = ListContainersOptions {
            all: true,
            filters,
            ..Default::default()
        };

        let containers = self
            .call(
                self.limits.list_timeout_secs,
                self.client.list_containers(Some(options)),
            )
            .await?;

        Ok(containers.into_iter().map(snapshot_from_summary).collect())
    }

    async fn list_with_stats(&self, project: &str) -> Result<Vec<ContainerSnapshot>> {
        let mut containers = self.list(project).await?;

        let samples = futures::future::join_all(containers.iter().map(|c| async move {
            if c.is_running() {
                Some(self.sample_cpu(&c.id.0).await)
            } else {
                None
            }
        }))
        .await;

        for (container, sample) in containers.iter_mut().zip(samples) {
            match sample {
                Some(Ok(pct)) => container.cpu_percent = pct,
                Some(Err(e)) => {
                    tracing::debug!("Stats unavailable for {}: {}", container.service, e);
                }
                None => {}
            }
        }

        Ok(containers)
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.call(
            self.limits.start_timeout_secs,
            self.client
                .start_container(&id.0, None::<StartContainerOptions<String>>),
        )
        .await
    }

    async fn stop(&self, id: &ContainerId, timeout_secs: i64) -> Result<()> {
        let t = normalize_stop_timeout(timeout_secs);
        let options = StopContainerOptions { t };
        self.call(
            t as u64 + 5,
            self.client.stop_container(&id.0, Some(options)),
        )
        .await
    }

    async fn restart(&self, id: &ContainerId, timeout_secs: i64) -> Result<()> {
        let t = normalize_stop_timeout(timeout_secs);
        let options = RestartContainerOptions { t: t as isize };
        self.call(
            t as u64 + 5,
            self.client.restart_container(&id.0, Some(options)),
        )
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.call(CONNECT_TIMEOUT_SECS, self.client.ping())
            .await
            .map(|_| ())
    }
}

//! End-to-end tests against a real Docker daemon and `docker compose`.
//!
//! Tests that need the daemon skip gracefully when it is not reachable.

use stackman_config::{GlobalConfig, StackEnv};
use stackman_core::{CoreError, Project, StackManager};
use stackman_provider::{
    create_default_runtime, ComposeCli, ComposeOperation, ContainerStatus, OutputLine,
};
use std::time::Duration;
use tempfile::TempDir;

const COMPOSE_FILE: &str = r#"services:
  web:
    image: busybox:latest
    command: ["sleep", "300"]
"#;

/// Temporary stack: `<tmp>/docker-compose.yml` and a `<tmp>/site` project
fn create_test_stack() -> (TempDir, Project, StackEnv) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let stack_file = temp.path().join("docker-compose.yml");
    std::fs::write(&stack_file, COMPOSE_FILE).expect("failed to write compose file");

    let site = temp.path().join("site");
    std::fs::create_dir_all(site.join("public_html")).expect("failed to create project");
    let project = Project::detect(&site).expect("failed to detect project");

    (temp, project, StackEnv::default().with_stack_file(stack_file))
}

/// Connected manager, or None when Docker is unavailable
async fn get_test_manager(stack: StackEnv) -> Option<StackManager> {
    let config = GlobalConfig::default();
    let runtime = create_default_runtime(&config).await.ok()?;
    Some(StackManager::new(runtime, Box::new(ComposeCli::new()), stack, config))
}

/// Follow a stream to its end, returning every line
async fn collect_stream(manager: &StackManager, operation: ComposeOperation, project: &Project) -> Vec<OutputLine> {
    let mut rx = manager.stream(operation, project).expect("stream should start");
    let mut lines = Vec::new();
    while let Ok(Some(line)) = tokio::time::timeout(Duration::from_secs(180), rx.recv()).await {
        lines.push(line);
    }
    lines
}

#[tokio::test]
async fn test_stream_rejects_missing_stack_file() {
    let temp = TempDir::new().unwrap();
    let project = Project::detect(temp.path()).unwrap();
    let manager = StackManager::compose_only(
        Box::new(ComposeCli::new()),
        StackEnv::default().with_stack_file(temp.path().join("missing.yml")),
        GlobalConfig::default(),
    );

    let err = manager.stream(ComposeOperation::Up, &project).unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
    assert!(err.to_string().contains("docker-compose file not found at"));
}

#[tokio::test]
async fn test_stack_lifecycle() {
    let (_temp, project, stack) = create_test_stack();
    let Some(manager) = get_test_manager(stack).await else {
        eprintln!("Skipping: Docker is not available");
        return;
    };

    let up = collect_stream(&manager, ComposeOperation::Up, &project).await;
    // No compose plugin or no registry access
    if up.last() != Some(&OutputLine::Complete) {
        eprintln!("Skipping: docker compose up did not complete: {:?}", up);
        return;
    }

    let containers = manager.list_with_stats(&project).await.unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].service, "web");
    assert_eq!(containers[0].status, ContainerStatus::Running);

    manager.stop(&containers[0].id).await.unwrap();
    let stopped = manager.list(&project).await.unwrap();
    assert_eq!(stopped[0].status, ContainerStatus::Stopped);

    let destroy = collect_stream(&manager, ComposeOperation::Destroy, &project).await;
    assert_eq!(destroy.last(), Some(&OutputLine::Complete), "output: {:?}", destroy);
    assert!(manager.list(&project).await.unwrap().is_empty());
}

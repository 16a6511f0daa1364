//! Rendering tests: draw the dashboard to a TestBackend and inspect the text

mod helpers;

use crossterm::event::{KeyCode, KeyModifiers};
use helpers::{fast_config, render_app, started_app, test_app, Fixture};
use stackman_core::test_support::{MockRunner, MockRuntime};
use stackman_core::StackManager;
use stackman_provider::{ComposeOperation, ContainerStatus, OutputLine};
use stackman_tui::{App, Panel, View};

const WIDTH: u16 = 120;
const HEIGHT: u16 = 36;

fn running_stack() -> Vec<stackman_provider::ContainerSnapshot> {
    vec![
        MockRuntime::snapshot("nginx", ContainerStatus::Running),
        MockRuntime::snapshot("mariadb", ContainerStatus::Running),
        MockRuntime::snapshot("phpmyadmin", ContainerStatus::Stopped),
    ]
}

#[tokio::test]
async fn test_render_preflight_missing_public_html() {
    let fixture = Fixture::bare();
    let app = started_app(&MockRuntime::new(), &MockRunner::new(), &fixture).await;

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("stackman - Stack Manager"));
    assert!(output.contains("Preflight"));
    assert!(output.contains("Project 'my-site'"));
    assert!(output.contains("[✗] public_html missing"));
    assert!(output.contains("t: Install template"));
}

#[tokio::test]
async fn test_render_preflight_ready() {
    let fixture = Fixture::scaffolded();
    let app = started_app(&MockRuntime::new(), &MockRunner::new(), &fixture).await;

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("[✓] public_html found"));
    assert!(output.contains("No containers running"));
}

#[tokio::test]
async fn test_render_status_table() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let app = started_app(&runtime, &MockRunner::new(), &fixture).await;
    assert_eq!(app.state.panel, Panel::Status);

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Containers - my-site"));
    assert!(output.contains("Service"));
    assert!(output.contains("nginx"));
    assert!(output.contains("Running"));
    assert!(output.contains("Stopped"));
    assert!(output.contains("http://localhost:80"));
    assert!(output.contains("3 containers"));
    assert!(output.contains("▶"), "selected row is highlighted");
}

#[tokio::test]
async fn test_render_output_panel() {
    let fixture = Fixture::scaffolded();
    let mut app = test_app(&MockRuntime::new(), &MockRunner::new(), &fixture);
    app.state.panel = Panel::Output;
    app.state.operation = Some(ComposeOperation::Up);
    app.state.output = vec![
        OutputLine::parse("Creating network"),
        OutputLine::parse("ERROR: pull access denied"),
        OutputLine::Complete,
    ];

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Output:"));
    assert!(output.contains("Esc to close"));
    assert!(output.contains("Creating network"));
    assert!(output.contains("ERROR: pull access denied"));
    assert!(output.contains("[Complete]"));
}

#[tokio::test]
async fn test_render_output_while_streaming() {
    let fixture = Fixture::scaffolded();
    let mut app = test_app(&MockRuntime::new(), &MockRunner::new(), &fixture);
    app.state.panel = Panel::Output;
    app.state.streaming = true;
    app.state.operation = Some(ComposeOperation::Restart);

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("(running...)"));
    assert!(!output.contains("Esc to close"));
}

#[tokio::test]
async fn test_render_confirm_dialog_steps() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let mut app = started_app(&runtime, &MockRunner::new(), &fixture).await;

    app.send_key(KeyCode::Char('d'), KeyModifiers::NONE)
        .await
        .unwrap();
    app.send_text("ye").await.unwrap();
    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Destroy Stack"));
    assert!(output.contains("Step 1 of 2"));
    assert!(output.contains("> ye"));
    assert!(output.contains("Esc: Cancel"));

    app.send_text("s").await.unwrap();
    app.send_key(KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Step 2 of 2"));
    assert!(output.contains("destroy"));
}

#[tokio::test]
async fn test_render_disconnected_banner() {
    let fixture = Fixture::scaffolded();
    let manager = StackManager::disconnected(
        Box::new(MockRunner::new()),
        fixture.stack_env(),
        fast_config(),
        "daemon unavailable".to_string(),
    );
    let app = App::new(manager, fixture.project_dir.clone());

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Not connected to Docker: daemon unavailable"));
}

#[tokio::test]
async fn test_render_help_view() {
    let fixture = Fixture::scaffolded();
    let mut app = test_app(&MockRuntime::new(), &MockRunner::new(), &fixture);
    app.state.view = View::Help;

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Help"));
    assert!(output.contains("Destroy the stack and its volumes"));
    assert!(output.contains("Esc: Back"));
}

#[tokio::test]
async fn test_render_error_replaces_status() {
    let fixture = Fixture::scaffolded();
    let mut app = test_app(&MockRuntime::new(), &MockRunner::new(), &fixture);
    app.state.status_message = Some("Refreshing...".to_string());
    app.state.last_error = Some("Docker daemon is not running".to_string());

    let output = render_app(&app, WIDTH, HEIGHT);
    assert!(output.contains("Docker daemon is not running"));
    assert!(!output.contains("Refreshing..."));
}

#[tokio::test]
async fn test_render_small_terminal_does_not_panic() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let mut app = started_app(&runtime, &MockRunner::new(), &fixture).await;
    app.send_key(KeyCode::Char('d'), KeyModifiers::NONE)
        .await
        .unwrap();

    let _ = render_app(&app, 20, 6);
}

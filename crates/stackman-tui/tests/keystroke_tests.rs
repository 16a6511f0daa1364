//! Integration tests that exercise App key handling via send_key()

mod helpers;

use crossterm::event::{KeyCode, KeyModifiers};
use helpers::{started_app, Fixture, WAIT};
use stackman_core::test_support::{MockCall, MockRunner, MockRuntime};
use stackman_provider::{ComposeOperation, ContainerStatus, OutputLine, ProviderError};
use stackman_tui::{App, ConfirmStage, Panel};

fn running_stack() -> Vec<stackman_provider::ContainerSnapshot> {
    vec![
        MockRuntime::snapshot("nginx", ContainerStatus::Running),
        MockRuntime::snapshot("mariadb", ContainerStatus::Running),
    ]
}

async fn press(app: &mut App, code: KeyCode) {
    app.send_key(code, KeyModifiers::NONE).await.unwrap();
}

fn stream_calls(runner: &MockRunner) -> Vec<ComposeOperation> {
    runner
        .get_calls()
        .into_iter()
        .filter_map(|c| match c {
            MockCall::Stream { operation, .. } => Some(operation),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stack start (streaming happy path)
// ---------------------------------------------------------------------------

/// Streamed lines land in order, then the dashboard settles on Status
#[tokio::test]
async fn test_start_stack_streams_then_settles() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    let runner = MockRunner::new();
    runner.set_stream_lines(["Creating network", "Creating container", "[Complete]"]);
    let mut app = started_app(&runtime, &runner, &fixture).await;
    assert_eq!(app.state.panel, Panel::Preflight);

    // The stack comes up once compose has run
    runtime.set_containers(running_stack());
    press(&mut app, KeyCode::Char('s')).await;
    assert_eq!(app.state.panel, Panel::Output);
    assert!(app.state.streaming);

    assert!(app.run_until(WAIT, |a| a.state.panel == Panel::Status).await);

    assert!(!app.state.streaming);
    assert_eq!(
        app.state.output,
        vec![
            OutputLine::Data("Creating network".into()),
            OutputLine::Data("Creating container".into()),
            OutputLine::Complete,
        ]
    );
    assert_eq!(app.state.output.last().unwrap().text(), "[Complete]");
    assert_eq!(stream_calls(&runner), vec![ComposeOperation::Up]);

    let refreshes = runtime
        .get_calls()
        .iter()
        .filter(|c| matches!(c, MockCall::List { .. }))
        .count();
    assert!(refreshes >= 2, "a refresh follows completion");
}

/// Start needs public_html; without it nothing is spawned
#[tokio::test]
async fn test_start_stack_requires_scaffold() {
    let fixture = Fixture::bare();
    let runner = MockRunner::new();
    let mut app = started_app(&MockRuntime::new(), &runner, &fixture).await;

    press(&mut app, KeyCode::Char('s')).await;
    assert_eq!(app.state.panel, Panel::Preflight);
    assert!(stream_calls(&runner).is_empty());
    assert!(app
        .state
        .status_message
        .as_deref()
        .unwrap()
        .contains("template"));
}

/// A missing compose file is reported at once and the panel stays on Preflight
#[tokio::test]
async fn test_missing_stack_file_rejected_synchronously() {
    let fixture = Fixture::without_stack_file();
    let runner = MockRunner::new();
    let mut app = started_app(&MockRuntime::new(), &runner, &fixture).await;

    press(&mut app, KeyCode::Char('s')).await;

    assert_eq!(app.state.panel, Panel::Preflight);
    assert!(!app.state.streaming);
    assert!(stream_calls(&runner).is_empty(), "no channel is created");
    let error = app.state.last_error.clone().unwrap();
    assert!(error.starts_with("docker-compose file not found at"));
    assert!(error.ends_with("please verify STACK_FILE path"));
}

/// A critical error keeps the output visible and accepts Esc afterwards
#[tokio::test]
async fn test_critical_stream_error_stays_on_output() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    runner.set_stream_lines([
        "Stopping nginx",
        "ERROR: Failed to start command: exec: \"docker\": not found",
    ]);
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('S')).await;
    assert!(app.run_until(WAIT, |a| !a.state.streaming).await);
    assert_eq!(app.state.panel, Panel::Output);
    assert!(matches!(app.state.output.last(), Some(OutputLine::Fatal(_))));

    // Nothing pulls the panel away on its own
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    app.drain_pending();
    assert_eq!(app.state.panel, Panel::Output);

    press(&mut app, KeyCode::Esc).await;
    assert_eq!(app.state.panel, Panel::Status);
}

/// Keys for a second operation are ignored while streaming
#[tokio::test]
async fn test_no_second_operation_while_streaming() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    runner.set_stream_lines(["Restarting"]);
    runner.set_keep_open(true);
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('R')).await;
    assert!(app.state.streaming);
    press(&mut app, KeyCode::Char('S')).await;
    press(&mut app, KeyCode::Char('d')).await;
    press(&mut app, KeyCode::Esc).await;

    assert_eq!(stream_calls(&runner), vec![ComposeOperation::Restart]);
    assert_eq!(app.state.panel, Panel::Output);
    assert_eq!(app.state.confirmation.stage(), ConfirmStage::Idle);
}

/// A runner failure is shown and streaming ends
#[tokio::test]
async fn test_stream_spawn_failure() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    runner.set_stream_error(ProviderError::PermissionDenied(
        "permission denied while trying to connect".to_string(),
    ));
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('R')).await;
    assert!(app.run_until(WAIT, |a| !a.state.streaming).await);
    assert_eq!(app.state.panel, Panel::Output);
    assert!(app.state.output.last().unwrap().is_error());
    assert!(app.state.last_error.is_some());
}

// ---------------------------------------------------------------------------
// Destroy confirmation
// ---------------------------------------------------------------------------

/// d, "yes", Enter, "destroy", Enter dispatches destroy and shows output
#[tokio::test]
async fn test_destroy_confirmation_flow() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('d')).await;
    assert_eq!(app.state.confirmation.stage(), ConfirmStage::FirstPrompt);

    app.send_text("yes").await.unwrap();
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.state.confirmation.stage(), ConfirmStage::SecondPrompt);

    app.send_text("destroy").await.unwrap();
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.state.confirmation.stage(), ConfirmStage::Idle);
    assert_eq!(app.state.confirmation.first_input(), "");
    assert_eq!(app.state.confirmation.second_input(), "");
    assert_eq!(app.state.panel, Panel::Output);
    assert!(app.state.output.is_empty());
    assert_eq!(stream_calls(&runner), vec![ComposeOperation::Destroy]);
}

/// A wrong answer clears the field and keeps the prompt
#[tokio::test]
async fn test_destroy_wrong_answers() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('d')).await;
    app.send_text("YES").await.unwrap();
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.state.confirmation.stage(), ConfirmStage::FirstPrompt);
    assert_eq!(app.state.confirmation.first_input(), "");

    app.send_text("yes").await.unwrap();
    press(&mut app, KeyCode::Enter).await;
    app.send_text("destory").await.unwrap();
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.state.confirmation.stage(), ConfirmStage::SecondPrompt);
    assert_eq!(app.state.confirmation.second_input(), "");
    assert!(stream_calls(&runner).is_empty());
}

/// Esc from either prompt cancels everything
#[tokio::test]
async fn test_destroy_cancel() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('d')).await;
    app.send_text("yes").await.unwrap();
    press(&mut app, KeyCode::Enter).await;
    app.send_text("dest").await.unwrap();
    press(&mut app, KeyCode::Esc).await;

    assert_eq!(app.state.confirmation.stage(), ConfirmStage::Idle);
    assert_eq!(app.state.confirmation.first_input(), "");
    assert_eq!(app.state.confirmation.second_input(), "");
    assert_eq!(app.state.panel, Panel::Status);
    assert!(stream_calls(&runner).is_empty());
}

/// While prompting, dashboard shortcuts are typed into the field instead
#[tokio::test]
async fn test_confirmation_swallows_shortcuts() {
    let fixture = Fixture::scaffolded();
    let runtime = MockRuntime::new();
    runtime.set_containers(running_stack());
    let runner = MockRunner::new();
    let mut app = started_app(&runtime, &runner, &fixture).await;

    press(&mut app, KeyCode::Char('d')).await;
    for c in ['s', 'S', 'R', 'r', 'j', 'q', '?'] {
        press(&mut app, KeyCode::Char(c)).await;
    }

    assert_eq!(app.state.confirmation.first_input(), "sSRrjq?");
    assert_eq!(app.state.selected, 0);
    assert!(!app.should_quit);
    assert!(stream_calls(&runner).is_empty());
    assert!(!runtime
        .get_calls()
        .iter()
        .any(|c| matches!(c, MockCall::Stop { .. } | MockCall::Restart { .. })));
}

// ---------------------------------------------------------------------------
// Quit
// ---------------------------------------------------------------------------

/// q quits from the dashboard
#[tokio::test]
async fn test_q_quits() {
    let fixture = Fixture::scaffolded();
    let mut app = started_app(&MockRuntime::new(), &MockRunner::new(), &fixture).await;

    press(&mut app, KeyCode::Char('q')).await;
    assert!(app.should_quit);
}

/// Ctrl+C quits even while the confirmation prompt is open
#[tokio::test]
async fn test_ctrl_c_quits_during_confirmation() {
    let fixture = Fixture::scaffolded();
    let mut app = started_app(&MockRuntime::new(), &MockRunner::new(), &fixture).await;

    press(&mut app, KeyCode::Char('d')).await;
    assert!(app.state.confirmation.is_active());

    app.send_key(KeyCode::Char('c'), KeyModifiers::CONTROL)
        .await
        .unwrap();
    assert!(app.should_quit);
}
